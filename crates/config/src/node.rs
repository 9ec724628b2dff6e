//! TOML node configuration.
//!
//! ```toml
//! [protocol]
//! network = "testnet"
//!
//! [protocol.hardforks]
//! Aspidochelone = 0
//! Echidna = 1200
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::network::NetworkType;
use crate::protocol::ProtocolSettings;
use neo_primitives::Hardfork;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub protocol: ProtocolConfig,
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), network = %config.protocol.network, "loaded node configuration");
        Ok(config)
    }

    /// Parses and validates a configuration document.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: NodeConfig = toml::from_str(contents)?;
        config.protocol.settings()?;
        Ok(config)
    }

    /// Effective protocol settings.
    pub fn protocol_settings(&self) -> ConfigResult<ProtocolSettings> {
        self.protocol.settings()
    }
}

/// The `[protocol]` section: a network preset with optional overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolConfig {
    pub network: NetworkType,
    /// Overrides the preset's network magic.
    pub magic: Option<u32>,
    /// Replaces the preset's hardfork heights entirely.
    pub hardforks: Option<BTreeMap<Hardfork, u32>>,
}

impl ProtocolConfig {
    /// Applies the overrides on top of the network preset.
    pub fn settings(&self) -> ConfigResult<ProtocolSettings> {
        let preset = self.network.settings();
        let network = self.magic.unwrap_or(preset.network);
        match &self.hardforks {
            Some(hardforks) => ProtocolSettings::new(network, hardforks.clone()),
            None => Ok(ProtocolSettings { network, ..preset }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `neo_native=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
            LogFormat::Pretty => f.write_str("pretty"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!("Unknown log format: {s}")),
        }
    }
}
