//! Configuration loading and management
//!
//! Configuration is read from YAML. Every section has defaults, so an empty
//! document is a valid configuration. A few environment variables override
//! the file after loading:
//!
//! - `CATALOG_BIND_ADDRESS`: `server.bind_address`
//! - `CATALOG_LOG`: `server.log_filter`
//! - `CATALOG_DATABASE_URL`: switches storage to postgres with that url

use crate::core::error::{CatalogResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const ENV_BIND_ADDRESS: &str = "CATALOG_BIND_ADDRESS";
pub const ENV_LOG: &str = "CATALOG_LOG";
pub const ENV_DATABASE_URL: &str = "CATALOG_DATABASE_URL";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g. "127.0.0.1:8080")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_filter() -> String {
    "info,tower_http=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Parse the bind address
    pub fn socket_addr(&self) -> CatalogResult<SocketAddr> {
        self.bind_address.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                field: "server.bind_address".to_string(),
                value: self.bind_address.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Which item store to use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Postgres {
        url: String,
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

impl StorageBackend {
    /// Short backend name for logs
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::InMemory => "in-memory",
            StorageBackend::Postgres { .. } => "postgres",
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

impl CatalogConfig {
    /// Load configuration from a YAML file, then apply environment overrides
    pub fn from_yaml_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration from a YAML string (no environment overrides)
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let config = Self::parse(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // serde_yaml reads an empty document as null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Apply overrides looked up through `lookup` (normally `std::env::var`)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> CatalogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
            self.server.bind_address = addr;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.server.log_filter = filter;
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            let max_connections = match self.storage.backend {
                StorageBackend::Postgres {
                    max_connections, ..
                } => max_connections,
                StorageBackend::InMemory => default_max_connections(),
            };
            self.storage.backend = StorageBackend::Postgres {
                url,
                max_connections,
            };
        }

        self.validate()?;
        Ok(self)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> CatalogResult<()> {
        self.server.socket_addr()?;

        if let StorageBackend::Postgres {
            url,
            max_connections,
        } = &self.storage.backend
        {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "storage.backend.url".to_string(),
                    value: url.clone(),
                    message: "must not be empty".to_string(),
                }
                .into());
            }
            if *max_connections == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "storage.backend.max_connections".to_string(),
                    value: max_connections.to_string(),
                    message: "must be at least 1".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}
