//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the execution mode, UI language, admin server address and
//! the backend used for the legacy persistent credential holder.
//!
//! Configuration is stored at `<config dir>/keygate/config.json`, or under
//! `KEYGATE_DATA_DIR` when that variable is set.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::locale::Locale;
use crate::mode::ExecutionMode;

/// Application name used for config/data directory paths
const APP_NAME: &str = "keygate";

/// Config file name
pub const CONFIG_FILE: &str = "config.json";

/// Admin server the hosted UI talks to by default
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8045";

pub const ENV_DATA_DIR: &str = "KEYGATE_DATA_DIR";
pub const ENV_MODE: &str = "KEYGATE_MODE";
pub const ENV_API_URL: &str = "KEYGATE_API_URL";

/// Where the legacy persistent credential lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistentBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: ExecutionMode,
    pub language: Locale,
    pub api_base_url: String,
    pub persistent_backend: PersistentBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            language: Locale::default(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            persistent_backend: PersistentBackend::default(),
        }
    }
}

impl Config {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override fields from `KEYGATE_MODE` and `KEYGATE_API_URL`.
    pub fn apply_env(&mut self) {
        if let Some(raw) = non_blank_env(ENV_MODE) {
            match raw.parse() {
                Ok(mode) => self.mode = mode,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_MODE),
            }
        }
        if let Some(url) = non_blank_env(ENV_API_URL) {
            self.api_base_url = url;
        }
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(CONFIG_FILE))
    }

    /// Directory holding config, the persistent store and logs.
    pub fn data_dir() -> Result<PathBuf> {
        if let Some(dir) = non_blank_env(ENV_DATA_DIR) {
            return Ok(PathBuf::from(dir));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
