//! File logging setup on top of the `log` facade.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Install the global logger described by `config`.
///
/// Returns the log file path when logging is enabled, `None` otherwise.
/// With logging disabled the `log` macros stay no-ops.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }

    let level: log::LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("Invalid logging level '{}'", config.level))?;

    let path = match &config.file {
        Some(path) => path.clone(),
        None => get_log_file_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(file)
        .apply()
        .context("Failed to install logger")?;

    log::info!("Logging to {}", path.display());
    Ok(Some(path))
}

/// Default log file location
pub fn get_log_file_path() -> Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))
        .map(|dir| dir.join("mastertask").join("mastertask.log"))
}
