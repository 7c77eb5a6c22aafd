//! Client configuration.
//!
//! Stored as a JSON file; a missing file yields the defaults, which point at
//! a local development backend.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::errors::ConfigError;

/// Configuration for the sync client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the bookmark service REST API.
    pub api_base_url: String,
    /// Path of the SQLite storage database.
    pub storage_path: String,
    /// Per-request timeout for gateway calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            storage_path: "linkstash.db".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from a JSON file.
    ///
    /// A missing file returns the defaults; a malformed one is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read config file: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Serialization(format!("Failed to parse config file: {}", e)))
    }

    /// Saves the configuration as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }
}
