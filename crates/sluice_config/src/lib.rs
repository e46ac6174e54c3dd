//! Parsing and validation of `sluice.toml` policy files.
//!
//! The canonicalizer's optional rewrites and the debug verification switch are
//! policy, not semantics, so they live in a small configuration file that is
//! loaded into a strongly-typed [`SluiceConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
