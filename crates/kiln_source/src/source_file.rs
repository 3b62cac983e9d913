//! Source text with line-start indexing for fast line/column lookup.

use crate::location::Location;
use kiln_common::ContentHash;
use std::path::PathBuf;

/// The text of one source file as seen by the parser.
///
/// Stores the content along with precomputed line-start offsets so that
/// diagnostic offsets can be turned into line/column pairs cheaply. Offsets
/// count characters (Unicode scalar values), not bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The file name the parser was given (used in diagnostics).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Character offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Number of characters in `content`.
    char_len: u32,
    /// Hash of the content.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts and content hash.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let (line_starts, char_len) = compute_line_starts(&content);
        let content_hash = ContentHash::of_text(&content);
        Self {
            path: path.into(),
            content,
            line_starts,
            char_len,
            content_hash,
        }
    }

    /// Converts a character offset into 1-indexed (line, column) coordinates.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn line_col(&self, char_offset: u32) -> (u32, u32) {
        let offset = char_offset.min(self.char_len);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let col = offset - self.line_starts[line_idx] + 1;
        (line_idx as u32 + 1, col)
    }

    /// Resolves a character offset into a [`Location`] in this file.
    pub fn location(&self, char_offset: u32) -> Location {
        let (line, column) = self.line_col(char_offset);
        Location {
            file_path: self.path.clone(),
            line,
            column,
        }
    }

    /// Converts a byte index into the content into a character offset.
    ///
    /// Indices inside a multi-byte character count as that character.
    pub fn char_offset(&self, byte_index: usize) -> u32 {
        let mut end = byte_index.min(self.content.len());
        while !self.content.is_char_boundary(end) {
            end -= 1;
        }
        self.content[..end].chars().count() as u32
    }

    /// Returns the number of lines in the file.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Computes the character offsets of each line start, and the total
/// character count.
fn compute_line_starts(content: &str) -> (Vec<u32>, u32) {
    let mut starts = vec![0u32];
    let mut count = 0u32;
    for ch in content.chars() {
        count += 1;
        if ch == '\n' {
            starts.push(count);
        }
    }
    (starts, count)
}
