//! Human-readable source locations.

use std::fmt;
use std::path::PathBuf;

/// A position in a source file resolved to 1-based line/column coordinates.
///
/// Produced by [`SourceFile::location`](crate::SourceFile::location).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The file name as it was handed to the parser.
    pub file_path: PathBuf,
    /// The line number (1-indexed).
    pub line: u32,
    /// The column number (1-indexed).
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.file_path.display(), self.line, self.column)
    }
}
