//! Configuration management for MasterTask
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{CONFIG_GENERATED, DEFAULT_BACKEND_URL, DEFAULT_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS};
use crate::utils::datetime::{self, DateFormat};
use crate::view::ViewSelector;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub refresh: RefreshConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend type; only "rest" is supported
    pub backend_type: String,
    /// Base URL of the task service
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// View to open on startup
    /// Options: "inbox", "today", "upcoming", "all", "notifications"
    pub default_view: String,
    /// Date format used when the user has no preference
    /// Options: "DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD", "DD.MM.YYYY", "MM.DD.YYYY"
    pub date_format: String,
}

/// Periodic refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Counter refresh interval in seconds (0 = disabled)
    pub interval_seconds: u64,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file; defaults to the user data directory
    pub file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to file
    pub enabled: bool,
    /// Level filter: "error", "warn", "info", "debug" or "trace"
    pub level: String,
    /// Log file; defaults to the user cache directory
    pub file: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: "rest".to_string(),
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: ViewSelector::Inbox.to_string(),
            date_format: DateFormat::default().to_string(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("mastertask.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("mastertask").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.backend.backend_type != "rest" {
            anyhow::bail!("unsupported backend_type '{}'", self.backend.backend_type);
        }

        let base_url = self.backend.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", self.backend.base_url);
        }

        if self.backend.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than 0");
        }

        self.default_view()?;
        self.date_format()?;

        if self.refresh.interval_seconds > MAX_REFRESH_INTERVAL_SECS {
            anyhow::bail!("interval_seconds cannot exceed {}", MAX_REFRESH_INTERVAL_SECS);
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        Ok(())
    }

    /// Parsed startup view
    pub fn default_view(&self) -> Result<ViewSelector> {
        self.ui
            .default_view
            .parse()
            .with_context(|| format!("Invalid default_view '{}'", self.ui.default_view))
    }

    /// Parsed fallback date format
    pub fn date_format(&self) -> Result<DateFormat> {
        self.ui
            .date_format
            .parse()
            .with_context(|| format!("Invalid date_format '{}'", self.ui.date_format))
    }

    /// Refresh period, or `None` when periodic refresh is disabled
    pub fn refresh_interval(&self) -> Option<std::time::Duration> {
        (self.refresh.interval_seconds > 0).then(|| std::time::Duration::from_secs(self.refresh.interval_seconds))
    }

    /// Session file location
    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session.file {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .join("mastertask")
                .join("session.json")),
        }
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# MasterTask Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::DATE_KEY_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        log::info!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("mastertask"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
