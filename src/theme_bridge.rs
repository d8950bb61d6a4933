//! Glue between the theme controller and egui.

use eframe::egui;
use ppl_core::theme::{EffectiveTheme, RenderError, RenderContext};
use std::cell::RefCell;

pub struct EguiRender {
    ctx: egui::Context,
    theme_color: RefCell<Option<String>>,
}

impl EguiRender {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            theme_color: RefCell::new(None),
        }
    }

    /// Last background color mirrored by the controller, as `#rrggbb`.
    pub fn theme_color(&self) -> Option<String> {
        self.theme_color.borrow().clone()
    }
}

impl RenderContext for EguiRender {
    fn set_theme_marker(&self, theme: EffectiveTheme) -> Result<(), RenderError> {
        // Pinning the preference stops egui from following the OS on its own.
        self.ctx.set_theme(match theme {
            EffectiveTheme::Light => egui::Theme::Light,
            EffectiveTheme::Dark => egui::Theme::Dark,
        });
        Ok(())
    }

    fn background_color(&self) -> Result<Option<String>, RenderError> {
        let fill = self.ctx.style().visuals.panel_fill;
        Ok(Some(format!("#{:02x}{:02x}{:02x}", fill.r(), fill.g(), fill.b())))
    }

    fn set_theme_color(&self, color: &str) -> Result<(), RenderError> {
        *self.theme_color.borrow_mut() = Some(color.to_string());
        Ok(())
    }
}

pub fn effective_from_egui(theme: egui::Theme) -> EffectiveTheme {
    match theme {
        egui::Theme::Light => EffectiveTheme::Light,
        egui::Theme::Dark => EffectiveTheme::Dark,
    }
}

/// The OS preference eframe reported for the current frame, if any.
pub fn system_theme(ctx: &egui::Context) -> Option<EffectiveTheme> {
    ctx.input(|i| i.raw.system_theme).map(effective_from_egui)
}
