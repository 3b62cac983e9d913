//! Error types for host operations.

use kiln_common::InternalError;
use std::path::PathBuf;

/// Errors returned to the build driver.
///
/// Compiler diagnostics are never reported this way; they arrive on the event
/// channel and the operation that raised them still succeeds.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A file was added after a compile pass in the same generation.
    #[error("cannot add {path} after compiling; reset the host to start a new build")]
    AddAfterCompile {
        /// The file the driver tried to add.
        path: PathBuf,
    },

    /// The compile service produced no output for the file, even after a
    /// compile pass was run on its behalf.
    #[error("no compiled output for {file}")]
    NoOutput {
        /// The source file whose output was requested.
        file: PathBuf,
    },

    /// A fatal diagnostic was raised in this generation, so no further output
    /// is produced until the next reset.
    #[error("compilation failed; no output for {file} in this build")]
    CompileFailed {
        /// The source file whose output was requested.
        file: PathBuf,
    },

    /// The process working directory could not be determined.
    #[error("cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// The compile service failed in a way no diagnostic describes.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_output_display() {
        let err = HostError::NoOutput {
            file: PathBuf::from("types.d.ts"),
        };
        assert_eq!(err.to_string(), "no compiled output for types.d.ts");
    }

    #[test]
    fn add_after_compile_display() {
        let err = HostError::AddAfterCompile {
            path: PathBuf::from("late.ts"),
        };
        assert!(err.to_string().contains("late.ts"));
        assert!(err.to_string().contains("reset"));
    }

    #[test]
    fn internal_is_transparent() {
        let err = HostError::from(InternalError::new("service crashed"));
        assert_eq!(err.to_string(), "internal error: service crashed");
    }
}
