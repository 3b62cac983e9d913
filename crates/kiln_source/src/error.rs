//! Error types for symlink resolution.

use std::path::PathBuf;

/// Errors raised while following a path through its symlinks.
///
/// Callers treat every variant as "no translation needed"; the error only
/// explains why the real path could not be computed.
#[derive(Debug, thiserror::Error)]
pub enum PathResolutionError {
    /// A component of the path does not exist on disk.
    #[error("path component does not exist: {path}")]
    Missing {
        /// The accumulated prefix that could not be found.
        path: PathBuf,
    },

    /// The symlink chain did not terminate within the hop limit.
    #[error("too many levels of symbolic links at {path}")]
    TooManyLinks {
        /// The link at which resolution gave up.
        path: PathBuf,
    },

    /// Any other I/O failure while inspecting a component.
    #[error("failed to inspect {path}: {source}")]
    Io {
        /// The component being inspected.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
