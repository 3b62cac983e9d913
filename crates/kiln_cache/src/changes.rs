//! Change detection between cache generations.

use std::collections::HashMap;

use kiln_common::ContentHash;
use kiln_source::CanonicalPath;

/// Result of comparing the current generation against the previous one.
///
/// Categorizes all files into new (not in the previous generation), modified
/// (hash changed), deleted (only in the previous generation), and unchanged.
/// Every list is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files that are not present in the previous generation.
    pub new_files: Vec<CanonicalPath>,

    /// Files whose content hash differs from the previous generation.
    pub modified_files: Vec<CanonicalPath>,

    /// Files present in the previous generation but not the current one.
    pub deleted_files: Vec<CanonicalPath>,

    /// Files whose content hash matches the previous generation.
    pub unchanged_files: Vec<CanonicalPath>,
}

impl ChangeSet {
    /// Compares two path-to-hash maps.
    pub fn between(
        current: &HashMap<&CanonicalPath, ContentHash>,
        previous: &HashMap<&CanonicalPath, ContentHash>,
    ) -> Self {
        let mut cs = ChangeSet::default();

        for (path, hash) in current {
            let bucket = match previous.get(path) {
                Some(old) if old == hash => &mut cs.unchanged_files,
                Some(_) => &mut cs.modified_files,
                None => &mut cs.new_files,
            };
            bucket.push((*path).clone());
        }

        cs.deleted_files = previous
            .keys()
            .filter(|p| !current.contains_key(*p))
            .map(|p| (*p).clone())
            .collect();

        cs.new_files.sort();
        cs.modified_files.sort();
        cs.deleted_files.sort();
        cs.unchanged_files.sort();
        cs
    }

    /// Returns `true` if there are no new, modified, or deleted files.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Returns the number of files that need reprocessing (new + modified).
    pub fn dirty_count(&self) -> usize {
        self.new_files.len() + self.modified_files.len()
    }
}
