mod app;
mod config;
mod storage;
mod theme_bridge;

use app::PplPrepApp;
use config::{AppConfig, DEFAULT_LOG_FILTER};
use eframe::egui;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map(|c| c.log_filter.as_str())
            .unwrap_or(DEFAULT_LOG_FILTER),
    );
    let config = config.unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration; using defaults");
        AppConfig::default()
    });

    let store = storage::open_or_memory(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 520.0])
            .with_min_inner_size([560.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PPL Exam Prep",
        options,
        Box::new(move |cc| Ok(Box::new(PplPrepApp::new(cc, store)))),
    )
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
