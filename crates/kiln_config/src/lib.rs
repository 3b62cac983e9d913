//! Parsing and validation of `kiln.toml` host configuration.
//!
//! This crate reads the configuration file into a strongly-typed
//! [`HostConfig`] and resolves its directories into an absolute
//! [`ResolvedConfig`] the host and the compile service work from.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::ResolvedConfig;
pub use types::*;
