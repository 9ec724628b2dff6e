//! Error types for primitive parsing.

use thiserror::Error;

/// Errors raised while constructing or parsing primitive values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Input had the wrong shape (length, characters, prefix).
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Error message.
        message: String,
    },

    /// Name does not correspond to a known hardfork.
    #[error("Unknown hardfork: {name}")]
    UnknownHardfork {
        /// The rejected name.
        name: String,
    },

    /// Name is not an ABI parameter type.
    #[error("Unknown contract parameter type: {name}")]
    UnknownParameterType {
        /// The rejected name.
        name: String,
    },
}

impl PrimitiveError {
    /// Create an invalid format error.
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

/// Result type for primitive operations.
pub type PrimitiveResult<T> = std::result::Result<T, PrimitiveError>;
