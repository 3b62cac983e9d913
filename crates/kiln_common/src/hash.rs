//! Content hashing for detecting unchanged source text between builds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 identity of a file's text.
///
/// `kiln_cache` stores one per record and uses it in two places: as the
/// first half of the reuse check (`FileRecord::holds` compares the hash, then
/// the text, before a parsed handle is carried into the current generation)
/// and as the per-path value `ChangeSet::between` diffs across generations.
/// A mismatch proves the text changed without touching the text itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes a content hash of UTF-8 source text.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::of_text("const x = 1;");
        let b = ContentHash::of_text("const x = 1;");
        assert_eq!(a, b);
    }

    #[test]
    fn single_byte_change_differs() {
        let a = ContentHash::of_text("const x = 1;");
        let b = ContentHash::of_text("const x = 2;");
        assert_ne!(a, b);
    }

    #[test]
    fn text_and_bytes_agree() {
        assert_eq!(
            ContentHash::of_text("export {}"),
            ContentHash::from_bytes(b"export {}")
        );
    }

    #[test]
    fn reused_text_keeps_its_identity_across_generations() {
        let before = String::from("let a = 1;\n");
        let after = before.clone();
        assert_eq!(ContentHash::of_text(&before), ContentHash::of_text(&after));
        assert_ne!(
            ContentHash::of_text(&before),
            ContentHash::of_text("let a = 1;\r\n")
        );
    }

    #[test]
    fn display_is_hex() {
        let h = ContentHash::of_text("test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", ContentHash::of_text("test"));
        assert!(s.starts_with("ContentHash("));
        assert!(s.ends_with("..)"));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::of_text("serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
