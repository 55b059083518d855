//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file with environment-variable
//! overrides for the common knobs. With no file and no environment the
//! defaults serve the original deployment contract: in-memory storage on
//! port 8081.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    InMemory,
    Mongodb,
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Connection string for the MongoDB backend
    pub uri: String,
    /// Database name for the MongoDB backend
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            uri: "mongodb://localhost:27017".to_string(),
            database: "invoicebook".to_string(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path, e),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            file: None,
            message: e.to_string(),
        })
    }

    /// Apply environment-variable overrides.
    ///
    /// `INVOICEBOOK_PORT` overrides `server.port`; `INVOICEBOOK_MONGO_URI`
    /// overrides `storage.uri`. A malformed port is a startup error, not a
    /// silent fallback.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(port) = std::env::var("INVOICEBOOK_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: port.clone(),
                message: "expected a TCP port number".to_string(),
            })?;
        }
        if let Ok(uri) = std::env::var("INVOICEBOOK_MONGO_URI") {
            self.storage.uri = uri;
        }
        Ok(self)
    }
}
