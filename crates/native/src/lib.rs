//! # Neo Native
//!
//! Metadata registry and hardfork-gated dispatcher for Neo N3 native contracts.
//!
//! Native contracts declare every method and event they have ever exposed,
//! each with the range of hardforks it is active in. For a given block the
//! dispatcher derives the hardfork from the height, builds (or reuses) the
//! contract's view at that hardfork and resolves calls by `(name, argc)`
//! against it, so that replaying any block resolves exactly as it did when
//! the block was produced.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use neo_config::ProtocolSettings;
//! use neo_native::{Dispatcher, ExecutionContext, MemoryStore, NativeRegistry, Value};
//! use neo_primitives::native_contract_hash;
//!
//! let registry = Arc::new(NativeRegistry::standard().unwrap());
//! let dispatcher = Dispatcher::new(registry, ProtocolSettings::mainnet());
//!
//! let mut store = MemoryStore::new();
//! let mut ctx = ExecutionContext::new(&mut store, 1_0000_0000, 7_300_000);
//! let result = dispatcher
//!     .invoke(&mut ctx, &native_contract_hash("NeoToken"), "symbol", &[])
//!     .unwrap();
//! assert_eq!(result.value, Value::from("NEO"));
//! ```

pub mod cache;
pub mod contract;
pub mod contracts;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod metadata;
pub mod notify;
pub mod registry;
pub mod runtime;
pub mod value;
pub mod view;

pub use cache::MetadataCache;
pub use contract::NativeContract;
pub use contracts::{FungibleToken, GasToken, NeoToken, PolicyContract};
pub use descriptor::{
    params, ContractParameterDefinition, EventDescriptor, HardforkActivable, MethodDescriptor,
    MethodPrice,
};
pub use dispatcher::{Dispatcher, InvocationResult};
pub use error::{NativeError, NativeResult};
pub use metadata::ContractMetadata;
pub use notify::NotificationSink;
pub use registry::{NativeEntry, NativeRegistry};
pub use runtime::{ExecutionContext, GasMeter, MemoryStore, NotifyEvent, Storage, StorageKey};
pub use value::Value;
pub use view::{EffectiveMetadata, MethodEntry, ResolvedMethod};
