//! Persistent settings stored as JSON under `~/.blueprint/settings.json`.
//!
//! A missing file yields defaults. The credential can also come from the
//! environment, which takes precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the credential, in order. They win over
/// the settings file.
const KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub deploy_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            deploy_delay_ms: 3000,
        }
    }
}

impl Settings {
    pub fn configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.model.is_empty()
    }

    pub fn deploy_delay(&self) -> Duration {
        Duration::from_millis(self.deploy_delay_ms)
    }

    /// Apply the credential from the environment, if one is set.
    pub fn with_env_key(self) -> Self {
        let env_key = KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|v| !v.trim().is_empty());
        self.with_key_override(env_key)
    }

    fn with_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key {
            self.api_key = key;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve the settings directory (~/.blueprint/).
pub fn settings_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blueprint")
}

pub fn settings_path() -> PathBuf {
    settings_dir().join("settings.json")
}

/// Read settings from the default location. A missing file yields defaults.
pub fn read_settings() -> Result<Settings, SettingsError> {
    read_settings_from(&settings_path())
}

pub fn read_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
        path: path.display().to_string(),
        source,
    })
}

pub fn write_settings(settings: &Settings) -> Result<(), SettingsError> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)
}
