//! Neo native contract CLI library.
//!
//! Inspects the native contract registry at any point of the hardfork
//! timeline and plans validator governance invocations against it.

pub mod args;
pub mod commands;
pub mod logging;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
