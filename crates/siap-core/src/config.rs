//! Configuration management for the SIAP system

use crate::error::{Result, SiapError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw configuration structure matching credentials.json exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiapConfig {
    pub storage: StorageConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(alias = "path")] // Accept both 'data_root' and 'path'
    pub data_root: String,
}

/// Endpoint and credentials for the owner-alert/email gateway.
/// Both fields may be left empty; delivery then degrades per channel
/// (owner alerts fail with a configuration error, email silently skips).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(alias = "url", default)] // Accept both 'base_url' and 'url'
    pub base_url: String,

    #[serde(alias = "token", default)] // Accept both 'api_key' and 'token'
    pub api_key: String,
}

impl NotifierConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

impl SiapConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SiapError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| SiapError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self {
            storage: raw.storage,
            notifier: raw.notifier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_root.trim().is_empty() {
            return Err(SiapError::Config(
                "Storage data root is required".to_string(),
            ));
        }

        // Notifier credentials are optional, but half-configured is a mistake
        let has_url = !self.notifier.base_url.trim().is_empty();
        let has_key = !self.notifier.api_key.trim().is_empty();
        if has_url != has_key {
            return Err(SiapError::Config(
                "Notifier requires both base_url and api_key (or neither)".to_string(),
            ));
        }

        Ok(())
    }
}
