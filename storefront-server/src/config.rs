use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::anyhow;
use tracing::{info, warn};

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: try_load("STOREFRONT_BIND", "0.0.0.0:3000")?,
            data_dir: try_load("STOREFRONT_DATA_DIR", "data")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow!("environment misconfigured: {key}: {e}")
        })
}
