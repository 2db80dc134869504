//! Parsing and validation of `hsim.toml` verification configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`VerifyConfig`] describing the adder under test, the clock, and which
//! scenarios to run with which parameters.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
