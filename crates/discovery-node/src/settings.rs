//! Host settings read from the environment.
//!
//! The discovery configuration itself lives in the property file; these are
//! only the values a host supplies on its own behalf.

use std::path::PathBuf;
use std::time::Duration;

use bucket_discovery::ClusterAddress;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "discovery.toml";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7800;
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("DISCOVERY_NODE_ID is not set")]
    MissingNodeId,

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Host settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSettings {
    /// Property file consumed by `TomlConfigProvider`.
    pub config_path: PathBuf,
    pub node_id: String,
    pub address: ClusterAddress,
    /// Delay between refresh cycles.
    pub refresh_interval: Duration,
}

impl NodeSettings {
    /// Read settings from the process environment.
    ///
    /// - `DISCOVERY_CONFIG` (default: `discovery.toml`)
    /// - `DISCOVERY_NODE_ID` (required)
    /// - `DISCOVERY_HOST` (default: `127.0.0.1`)
    /// - `DISCOVERY_PORT` (default: `7800`)
    /// - `DISCOVERY_REFRESH_SECS` (default: `60`)
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let node_id = lookup("DISCOVERY_NODE_ID")
            .filter(|id| !id.trim().is_empty())
            .ok_or(SettingsError::MissingNodeId)?;

        let port = match lookup("DISCOVERY_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| SettingsError::Invalid {
                name: "DISCOVERY_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let refresh_secs = match lookup("DISCOVERY_REFRESH_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(SettingsError::Invalid {
                        name: "DISCOVERY_REFRESH_SECS",
                        value,
                    })
                }
            },
            None => DEFAULT_REFRESH_SECS,
        };

        Ok(Self {
            config_path: lookup("DISCOVERY_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            node_id,
            address: ClusterAddress::new(
                lookup("DISCOVERY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            ),
            refresh_interval: Duration::from_secs(refresh_secs),
        })
    }
}
