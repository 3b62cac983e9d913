//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur while feeding files into the cache.
///
/// These never escape the cache's public operations: a file that cannot be
/// read is simply not added, and the miss is logged.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The source file could not be read as UTF-8 text.
    #[error("failed to read source {path}: {source}")]
    Read {
        /// The canonical path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_display() {
        let err = CacheError::Read {
            path: PathBuf::from("/work/src/missing.ts"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to read source"));
        assert!(msg.contains("missing.ts"));
        assert!(msg.contains("file not found"));
    }
}
