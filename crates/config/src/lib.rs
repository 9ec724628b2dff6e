//! Neo Configuration Module
//!
//! Protocol settings (network magic and hardfork activation heights) and the
//! TOML node configuration consumed by the native contract layer.
//!
//! The height → hardfork mapping lives here; the dispatcher only asks
//! [`ProtocolSettings::hardfork_at`] which hardfork governs a block.

pub mod error;
pub mod network;
pub mod node;
pub mod protocol;

pub use error::{ConfigError, ConfigResult};
pub use network::NetworkType;
pub use node::{LogFormat, LoggingConfig, NodeConfig, ProtocolConfig};
pub use protocol::ProtocolSettings;

/// Network magic of Neo N3 MainNet ("NEO3").
pub const MAINNET_MAGIC: u32 = 0x334f_454e;
/// Network magic of Neo N3 TestNet (T5).
pub const TESTNET_MAGIC: u32 = 0x3554_334e;
/// Network magic used by private networks when none is configured.
pub const PRIVATE_MAGIC: u32 = 56753;
