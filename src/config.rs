use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

const QUALIFIER: &str = "rs";
const ORG_NAME: &str = "ppl";
const APP_NAME: &str = "ppl_prep";

const DATA_DIR_VAR: &str = "PPL_PREP_DATA_DIR";
const QUOTA_VAR: &str = "PPL_PREP_QUOTA_BYTES";
const LOG_VAR: &str = "PPL_PREP_LOG";

/// Same order of magnitude as a browser's local-storage allowance.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` when no platform data directory exists and none was configured.
    pub data_dir: Option<PathBuf>,
    pub quota_bytes: usize,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let set = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let data_dir = match set(DATA_DIR_VAR) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => default_data_dir(),
        };

        let quota_bytes = match set(QUOTA_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or(ConfigError::Invalid {
                    var: QUOTA_VAR,
                    value: raw,
                })?,
            None => DEFAULT_QUOTA_BYTES,
        };

        let log_filter = set(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            quota_bytes,
            log_filter,
        })
    }
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORG_NAME, APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
}
