// ABOUTME: Configuration loading for askcode.
// ABOUTME: Reads ~/.askcode/config.toml, applies env and CLI overrides, and resolves data paths.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::session::SESSIONS_KEY;

/// Environment variable that overrides the responder URL.
pub const ENDPOINT_ENV: &str = "ASKCODE_ENDPOINT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub responder: ResponderConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

/// Remote responder endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    pub base_url: String,
    pub query_param: String,
    /// Request timeout in seconds; 0 means wait indefinitely.
    pub timeout_seconds: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5249/OpenAi/CheckCode".to_string(),
            query_param: "text".to_string(),
            timeout_seconds: 0,
        }
    }
}

/// Where and under which key the session snapshot is stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Empty means the platform data directory.
    pub path: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            key: SESSIONS_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Empty means ~/.askcode/askcode.log.
    pub path: String,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.askcode/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Apply the endpoint override from the environment, if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            self.apply_endpoint_override(Some(url));
        }
    }

    pub fn apply_endpoint_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.responder.base_url = url;
        }
    }

    /// Directory holding config and logs.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".askcode")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Resolved path of the session storage file.
    pub fn storage_path(&self) -> PathBuf {
        if !self.storage.path.is_empty() {
            return PathBuf::from(&self.storage.path);
        }
        dirs::data_dir()
            .unwrap_or_else(Self::config_dir)
            .join("askcode")
            .join("storage.json")
    }

    /// Resolved path of the log file.
    pub fn log_path(&self) -> PathBuf {
        if !self.log.path.is_empty() {
            return PathBuf::from(&self.log.path);
        }
        Self::config_dir().join("askcode.log")
    }
}
