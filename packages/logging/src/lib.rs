#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Logging setup shared by the Proxima test harness binaries.
//!
//! Logs go through [`free_log_client`], filtered by `PROXIMA_LOG` (falling
//! back to `RUST_LOG`) as captured when the binary was built.

use std::path::PathBuf;

use free_log_client::FreeLogLayer;
use thiserror::Error;

pub use free_log_client;
pub use log;

#[cfg(feature = "macros")]
mod macros;

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "proxima=trace";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "proxima=info";

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Logs(#[from] free_log_client::LogsInitError),
    #[error(transparent)]
    BuildLogsConfig(#[from] free_log_client::BuildLogsConfigError),
    #[error(transparent)]
    BuildFileWriterConfig(#[from] free_log_client::BuildFileWriterConfigError),
}

/// The env filter directive baked in at build time.
#[must_use]
pub const fn env_filter() -> &'static str {
    match option_env!("PROXIMA_LOG") {
        Some(filter) => filter,
        None => match option_env!("RUST_LOG") {
            Some(filter) => filter,
            None => DEFAULT_LOG_LEVEL,
        },
    }
}

/// `~/.local/proxima/logs`, without creating it.
#[must_use]
pub fn log_dir_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".local").join("proxima").join("logs"))
}

fn make_log_dir_path() -> Option<PathBuf> {
    if let Some(path) = log_dir_path()
        && (path.is_dir() || std::fs::create_dir_all(&path).is_ok())
    {
        return Some(path);
    }

    None
}

/// Initializes the global logger.
///
/// When `filename` is given, debug-level output is also written to that file
/// inside [`log_dir_path`].
///
/// # Errors
///
/// * If the file writer config is invalid
/// * If the global logger was already initialized
pub fn init(filename: Option<&str>) -> Result<FreeLogLayer, InitError> {
    let mut logs_config = free_log_client::LogsConfig::builder();

    if let Some(filename) = filename {
        if let Some(log_dir) = make_log_dir_path() {
            logs_config = logs_config.with_file_writer(
                free_log_client::FileWriterConfig::builder()
                    .file_path(log_dir.join(filename))
                    .log_level(free_log_client::Level::Debug),
            )?;
        } else {
            log::warn!("Could not get home dir to put the logs into");
        }
    }

    let layer = free_log_client::init(logs_config.env_filter(env_filter()))?;

    Ok(layer)
}
