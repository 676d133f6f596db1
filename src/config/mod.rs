//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`engine`]: Rate-limit window, escalation thresholds, tracker scope,
//!   and the restricted-content vocabulary
//! - [`notify`]: Operator address, retry policy, and phrase pools

mod engine;
mod notify;

pub use engine::{ClassifierConfig, EngineConfig, TrackerScope};
pub use notify::NotifyConfig;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration, loaded from TOML.
///
/// Every section has full serde defaults so an empty file (or no file at
/// all) yields a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// Statistics endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Port for the plain-HTTP statistics endpoint.
    /// Convention: 0 disables the endpoint (used by tests).
    #[serde(default = "default_stats_port")]
    pub stats_port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            stats_port: default_stats_port(),
        }
    }
}

fn default_stats_port() -> u16 {
    8077
}
