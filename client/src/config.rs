//! Client configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tangle_types::SecurityLevel;
use tangle_utils::LogFormat;

use crate::ClientError;

/// Configuration for a [`Client`](crate::Client).
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Security level of derived addresses and signatures.
    #[serde(default)]
    pub security_level: SecurityLevel,

    /// Trailing zero trits required of every attached transaction.
    #[serde(default = "default_min_weight_magnitude")]
    pub min_weight_magnitude: u8,

    /// Highest key index the unused-address scan will try.
    #[serde(default = "default_max_address_index")]
    pub max_address_index: u64,

    /// Most transactions a traversed bundle may have.
    #[serde(default = "default_max_bundle_length")]
    pub max_bundle_length: usize,

    /// Proof-of-work threads; 0 uses every core.
    #[serde(default)]
    pub work_threads: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_min_weight_magnitude() -> u8 {
    14
}

fn default_max_address_index() -> u64 {
    1000
}

fn default_max_bundle_length() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ClientError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            security_level: SecurityLevel::default(),
            min_weight_magnitude: default_min_weight_magnitude(),
            max_address_index: default_max_address_index(),
            max_bundle_length: default_max_bundle_length(),
            work_threads: 0,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
