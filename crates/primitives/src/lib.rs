//! # Neo Primitives
//!
//! Fundamental types shared by the native contract layer:
//! - `UInt160`: 160-bit script hashes (contract and account addresses)
//! - `Hardfork`: ordered protocol upgrade points
//! - `CallFlags`: permissions granted to a contract call
//! - `ContractParameterType`: ABI parameter kinds
//! - `WitnessScope`: signer scopes used when building invocations
//!
//! ## Example
//!
//! ```rust
//! use neo_primitives::{native_contract_hash, Hardfork, UInt160};
//!
//! let neo = native_contract_hash("NeoToken");
//! assert_eq!(
//!     neo,
//!     UInt160::parse("0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5").unwrap()
//! );
//! assert!(Hardfork::HfAspidochelone < Hardfork::HfEchidna);
//! ```

pub mod call_flags;
pub mod contract_parameter_type;
pub mod error;
pub mod hardfork;
pub mod script_hash;
pub mod uint160;
pub mod witness_scope;

// Re-exports
pub use call_flags::CallFlags;
pub use contract_parameter_type::ContractParameterType;
pub use error::{PrimitiveError, PrimitiveResult};
pub use hardfork::{Hardfork, HardforkSelector};
pub use script_hash::{native_contract_hash, signature_account, PUBLIC_KEY_SIZE};
pub use uint160::{UInt160, UINT160_SIZE};
pub use witness_scope::WitnessScope;
