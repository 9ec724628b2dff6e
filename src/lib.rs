//! # Neo native contracts
//!
//! Umbrella crate over the native contract metadata registry and its
//! hardfork-gated dispatcher.
//!
//! - [`primitives`] - script hashes, hardforks, call flags and ABI types
//! - [`config`] - protocol settings and node configuration
//! - [`native`] - contract metadata, effective views, resolution and dispatch
//!
//! ## Quick Start
//!
//! ```rust
//! use neo_native_rs::prelude::*;
//!
//! let dispatcher = Dispatcher::new(
//!     std::sync::Arc::new(NativeRegistry::standard().unwrap()),
//!     ProtocolSettings::mainnet(),
//! );
//! let neo = native_contract_hash("NeoToken");
//! let before = dispatcher.resolve(&neo, "registerCandidate", 1, 7_299_999).unwrap();
//! let after = dispatcher.resolve(&neo, "registerCandidate", 1, 7_300_000).unwrap();
//! assert_ne!(before.index(), after.index());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use neo_config as config;
pub use neo_native as native;
pub use neo_primitives as primitives;

/// Common imports for working with native contracts
pub mod prelude {
    pub use crate::config::{NetworkType, NodeConfig, ProtocolSettings};
    pub use crate::native::{
        ContractMetadata, Dispatcher, EffectiveMetadata, ExecutionContext, InvocationResult,
        MemoryStore, MethodDescriptor, NativeContract, NativeError, NativeRegistry, NativeResult,
        NotificationSink, NotifyEvent, Value,
    };
    pub use crate::primitives::{
        native_contract_hash, CallFlags, ContractParameterType, Hardfork, HardforkSelector,
        UInt160,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
