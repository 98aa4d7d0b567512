//! Configuration file support for agentviz.
//!
//! Loads `agentviz.toml` from the working directory, falling back to the
//! user config directory (`~/.config/agentviz/agentviz.toml` on Linux).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agentviz_sessions::RegistryConfig;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "agentviz.toml";

/// Top-level configuration loaded from `agentviz.toml`
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Session registry settings
    #[serde(default)]
    pub sessions: RegistryConfig,
}

impl AppConfig {
    /// Load configuration from a directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        Self::load_file(&dir.join(CONFIG_FILE_NAME))
    }

    pub fn load_file(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// First config found in `working_dir`, then the user config dir.
    /// Defaults when neither exists.
    pub fn discover(working_dir: &Path) -> Result<Self> {
        if let Some(config) = Self::load(working_dir)? {
            return Ok(config);
        }
        if let Some(path) = user_config_path() {
            if let Some(config) = Self::load_file(&path)? {
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    /// Apply CLI overrides; flags win over the file.
    pub fn with_overrides(mut self, ttl: Option<Duration>, sweep_interval: Option<Duration>) -> Self {
        if let Some(ttl) = ttl {
            self.sessions.ttl = ttl;
        }
        if let Some(sweep_interval) = sweep_interval {
            self.sessions.sweep_interval = sweep_interval;
        }
        self
    }
}

/// `<config dir>/agentviz/agentviz.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agentviz").join(CONFIG_FILE_NAME))
}

/// Parse a humantime duration such as `30m` or `250ms`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| format!("Invalid duration '{}': {}", value, e))
}
