//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Hardfork heights are not continuous or not ordered.
    #[error("Invalid hardfork configuration: {message}")]
    InvalidHardforks {
        /// What is wrong.
        message: String,
    },

    /// Network name is not recognised.
    #[error("Unknown network type: {name}")]
    UnknownNetwork {
        /// The rejected name.
        name: String,
    },
}

impl ConfigError {
    /// Create an invalid hardforks error.
    pub fn invalid_hardforks<S: Into<String>>(message: S) -> Self {
        Self::InvalidHardforks {
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
