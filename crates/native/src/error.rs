//! Error types for native contract registration and dispatch.

use neo_primitives::{CallFlags, HardforkSelector, UInt160};
use thiserror::Error;

/// Errors raised by the registry, the resolver and the dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// A contract with the same id or hash is already registered.
    #[error("Duplicate native contract: {name} (id {id}, hash {hash})")]
    DuplicateContract {
        /// Rejected contract name.
        name: String,
        /// Contract id.
        id: i32,
        /// Contract hash.
        hash: UInt160,
    },

    /// No native contract is registered (or active) under the given key.
    #[error("Native contract not found: {contract}")]
    ContractNotFound {
        /// Hash, id or name that was looked up.
        contract: String,
    },

    /// No method with this name and parameter count exists at the hardfork.
    #[error("Method not found: {contract}.{method}/{parameter_count} at {hardfork}")]
    MethodNotFound {
        /// Contract name.
        contract: String,
        /// Method name.
        method: String,
        /// Number of parameters.
        parameter_count: usize,
        /// Hardfork the lookup ran against.
        hardfork: HardforkSelector,
    },

    /// More than one descriptor matches the same lookup key.
    #[error("Ambiguous method: {contract}.{method}/{parameter_count}")]
    AmbiguousMethod {
        /// Contract name.
        contract: String,
        /// Method name.
        method: String,
        /// Number of parameters.
        parameter_count: usize,
    },

    /// Descriptor metadata violates a registration rule.
    #[error("Invalid metadata for {contract}: {message}")]
    InvalidMetadata {
        /// Contract name.
        contract: String,
        /// What is wrong.
        message: String,
    },

    /// Wrong number of arguments.
    #[error("Arity mismatch calling {method}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Method name.
        method: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument does not fit its declared parameter type.
    #[error("Invalid argument {index} for {method}: {message}")]
    InvalidArgument {
        /// Method name.
        method: String,
        /// Zero-based argument position.
        index: usize,
        /// What is wrong.
        message: String,
    },

    /// The caller lacks call flags required by the operation.
    #[error("Permission denied for {operation}: missing {missing}")]
    PermissionDenied {
        /// Method or operation that was refused.
        operation: String,
        /// Flags that were required but not granted.
        missing: CallFlags,
    },

    /// The gas budget cannot cover the charge.
    #[error("Insufficient gas: required {required}, available {available}")]
    InsufficientGas {
        /// Amount that was requested.
        required: i64,
        /// Amount left in the budget.
        available: i64,
    },

    /// A handler emitted an event that is not declared at the current hardfork.
    #[error("Undeclared event {event} in {contract}")]
    UndeclaredEvent {
        /// Contract name.
        contract: String,
        /// Event name.
        event: String,
    },

    /// The storage collaborator failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },

    /// Contract-specific logical failure raised by a handler.
    #[error("{contract} failed: {message}")]
    Handler {
        /// Contract name.
        contract: String,
        /// Error message.
        message: String,
    },
}

impl NativeError {
    /// Create a contract not found error.
    pub fn contract_not_found<S: Into<String>>(contract: S) -> Self {
        Self::ContractNotFound {
            contract: contract.into(),
        }
    }

    /// Create an invalid metadata error.
    pub fn invalid_metadata<C: Into<String>, M: Into<String>>(contract: C, message: M) -> Self {
        Self::InvalidMetadata {
            contract: contract.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>, M: Into<String>>(
        method: S,
        index: usize,
        message: M,
    ) -> Self {
        Self::InvalidArgument {
            method: method.into(),
            index,
            message: message.into(),
        }
    }

    /// Create a storage error.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a handler error.
    pub fn handler<C: Into<String>, M: Into<String>>(contract: C, message: M) -> Self {
        Self::Handler {
            contract: contract.into(),
            message: message.into(),
        }
    }

    /// Errors that can only arise while assembling the registry. A node that
    /// hits one must refuse to start.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NativeError::DuplicateContract { .. }
                | NativeError::InvalidMetadata { .. }
                | NativeError::AmbiguousMethod { .. }
        )
    }
}

/// Result type for native contract operations.
pub type NativeResult<T> = std::result::Result<T, NativeError>;
