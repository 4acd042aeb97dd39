use std::{env, net::SocketAddr, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/target/targetd.json";

/// Process-wide configuration. Loaded once at startup and never mutated
/// afterwards; every key is optional in the file and falls back to a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub user: String,
    pub password: String,
    pub pool_name: String,
    pub ssl: bool,
    pub bind_addr: String,
    pub bind_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: "foo".to_string(),
            password: "bar".to_string(),
            pool_name: "test".to_string(),
            ssl: false,
            bind_addr: "0.0.0.0".to_string(),
            bind_port: 18700,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    /// Loads configuration from `TARGETD_CONFIG` if set, otherwise the
    /// default path. A missing file yields all defaults; an unreadable or
    /// malformed file is fatal.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("TARGETD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(path)
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Malformed { path, source })?;

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
