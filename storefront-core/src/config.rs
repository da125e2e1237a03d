use std::path::Path;
use std::{env, fs};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid {key} value '{value}'")]
    InvalidEnv { key: &'static str, value: String },
}

/// Where the admin tools find the storefront API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the TOML file if given, then `STOREFRONT_API_URL` and
    /// `STOREFRONT_TIMEOUT_SECS`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;
        info!("📁 Loaded client config from {}", shown);
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("STOREFRONT_API_URL") {
            info!("STOREFRONT_API_URL set, using {url}");
            self.base_url = url;
        }
        if let Ok(value) = env::var("STOREFRONT_TIMEOUT_SECS") {
            self.timeout_secs = value.trim().parse().map_err(|_| {
                warn!("Invalid STOREFRONT_TIMEOUT_SECS value: {value}");
                ConfigError::InvalidEnv {
                    key: "STOREFRONT_TIMEOUT_SECS",
                    value: value.clone(),
                }
            })?;
        }
        Ok(())
    }
}
