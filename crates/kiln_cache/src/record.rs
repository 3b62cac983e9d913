//! Per-file cache records.

use kiln_common::ContentHash;
use kiln_source::CanonicalPath;
use std::path::PathBuf;
use std::sync::Arc;

/// One file known to a cache generation.
#[derive(Debug, Clone)]
pub struct FileRecord<H> {
    /// Identity key.
    pub canonical_path: CanonicalPath,
    /// Path relative to the cache's working directory; the name the parser saw.
    pub relative_path: PathBuf,
    /// Exact text at last read.
    pub contents: Arc<str>,
    /// Hash of `contents`.
    pub content_hash: ContentHash,
    /// The compile service's parsed representation of `contents`.
    pub parsed: H,
    /// Whether the file was added as an entry point of the current build.
    pub is_root: bool,
    /// Whether the file lives in a dependency directory and is not a
    /// declaration file.
    pub is_dependency: bool,
}

impl<H> FileRecord<H> {
    /// Returns `true` if this record holds exactly `contents`.
    pub fn holds(&self, hash: ContentHash, contents: &str) -> bool {
        self.content_hash == hash && &*self.contents == contents
    }
}

/// Where the parsed handle for an admitted file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reuse {
    /// An identical record already existed in the current generation.
    Current,
    /// An identical record existed in the previous generation.
    Previous,
    /// The file was parsed afresh.
    Fresh,
}

/// Notification that the cache has seen a file, cached or not.
///
/// File watchers use these to learn which files a build depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileObserved {
    /// Path relative to the cache's working directory.
    pub file: PathBuf,
    /// Identity key.
    pub canonical_path: CanonicalPath,
}

/// The outcome of admitting a file into the current generation.
#[derive(Debug, Clone)]
pub struct Admitted<H> {
    /// The parsed handle now stored for the file.
    pub parsed: H,
    /// Where the handle came from.
    pub reuse: Reuse,
    /// The observation to forward to listeners.
    pub observed: FileObserved,
}
