//! Network presets.

use crate::error::ConfigError;
use crate::protocol::ProtocolSettings;
use crate::{MAINNET_MAGIC, PRIVATE_MAGIC, TESTNET_MAGIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network type for Neo blockchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[serde(alias = "main")]
    MainNet,
    #[default]
    #[serde(alias = "test")]
    TestNet,
    #[serde(alias = "privnet")]
    Private,
}

impl NetworkType {
    /// Gets the network magic number
    pub fn magic(&self) -> u32 {
        match self {
            NetworkType::MainNet => MAINNET_MAGIC,
            NetworkType::TestNet => TESTNET_MAGIC,
            NetworkType::Private => PRIVATE_MAGIC,
        }
    }

    /// Protocol settings preset for this network.
    pub fn settings(&self) -> ProtocolSettings {
        match self {
            NetworkType::MainNet => ProtocolSettings::mainnet(),
            NetworkType::TestNet => ProtocolSettings::testnet(),
            NetworkType::Private => ProtocolSettings::all_enabled(),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::MainNet => write!(f, "mainnet"),
            NetworkType::TestNet => write!(f, "testnet"),
            NetworkType::Private => write!(f, "private"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::MainNet),
            "testnet" | "test" => Ok(NetworkType::TestNet),
            "private" | "privnet" => Ok(NetworkType::Private),
            _ => Err(ConfigError::UnknownNetwork {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("MainNet".parse::<NetworkType>().unwrap(), NetworkType::MainNet);
        assert_eq!("test".parse::<NetworkType>().unwrap(), NetworkType::TestNet);
        assert_eq!("privnet".parse::<NetworkType>().unwrap(), NetworkType::Private);
        assert!(matches!(
            "moonnet".parse::<NetworkType>(),
            Err(ConfigError::UnknownNetwork { .. })
        ));
    }

    #[test]
    fn presets_carry_magic() {
        for network in [NetworkType::MainNet, NetworkType::TestNet, NetworkType::Private] {
            assert_eq!(network.settings().network, network.magic());
        }
        assert_eq!(NetworkType::MainNet.magic(), 860_833_102);
    }
}
