//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a `kiln.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed, or a value has the wrong type
    /// (for example an unknown `jsx` mode).
    #[error("invalid kiln.toml: {0}")]
    Parse(String),

    /// A required value is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A value parsed but is not acceptable.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
