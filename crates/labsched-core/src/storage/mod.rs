mod config;

pub use config::{Config, NotifyConfig, SmtpConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/labsched[-dev]/` based on LABSCHED_ENV.
///
/// Set LABSCHED_ENV=dev to use the development data directory, or
/// LABSCHED_HOME to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LABSCHED_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("LABSCHED_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("labsched-dev")
            } else {
                base_dir.join("labsched")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
