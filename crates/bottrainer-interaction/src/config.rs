//! Console settings file management.
//!
//! Reads `~/.config/bottrainer/console.toml` (platform config dir). Every
//! key is optional; a missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bottrainer_core::{ConsoleError, Result};
use serde::Deserialize;

use crate::transport::DEFAULT_BASE_URL;

/// Environment variable that overrides the settings file's `base_url`.
pub const BASE_URL_ENV: &str = "BOTTRAINER_BASE_URL";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Root structure of `console.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Backend origin, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Sampling temperature forwarded on analyze, if set
    pub temperature: Option<f32>,
    /// Value sent in the analyze `api_key` field
    pub api_key: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            api_key: String::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ConsoleSettings {
    /// Loads settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ConsoleError::config_load(format!(
                "Failed to read settings file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConsoleError::config_load(format!(
                "Failed to parse settings file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads settings from the default location, then applies the environment override.
    pub fn load() -> Result<Self> {
        let mut settings = match default_settings_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    /// Applies `BOTTRAINER_BASE_URL` if it is set and non-blank.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(BASE_URL_ENV) {
            self.override_base_url(Some(url));
        }
    }

    /// Replaces `base_url` with a non-blank override.
    pub fn override_base_url(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
    }
}

/// `<config_dir>/bottrainer/console.toml`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bottrainer").join("console.toml"))
}

/// `<data_dir>/bottrainer/logs`
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("bottrainer").join("logs"))
}
