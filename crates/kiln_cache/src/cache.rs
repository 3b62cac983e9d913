//! The two-generation file cache.
//!
//! Files enter the current generation through [`FileCache::add_file`] (entry
//! points named by the build driver) or [`FileCache::load`] (files the compile
//! service asks for while building a program). [`FileCache::reset`] demotes
//! the current generation to previous and starts an empty one; anything older
//! is dropped.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use kiln_common::ContentHash;
use kiln_source::{CanonicalPath, FileKind};

use crate::changes::ChangeSet;
use crate::error::CacheError;
use crate::record::{Admitted, FileObserved, FileRecord, Reuse};

/// Counters describing how files were admitted.
///
/// Counts accumulate over the lifetime of the cache and are not cleared by
/// [`FileCache::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Files handed to the parser.
    pub fresh_parses: usize,
    /// Files served from an identical current-generation record.
    pub current_hits: usize,
    /// Files served from an identical previous-generation record.
    pub previous_hits: usize,
    /// Reads that failed, leaving the file out of the cache.
    pub read_misses: usize,
}

/// Generational record of parsed files keyed by canonical path.
pub struct FileCache<H> {
    current_dir: CanonicalPath,
    dependency_dir: String,
    current: HashMap<CanonicalPath, FileRecord<H>>,
    previous: HashMap<CanonicalPath, FileRecord<H>>,
    stats: CacheStats,
}

impl<H: Clone> FileCache<H> {
    /// Creates an empty cache.
    ///
    /// Relative paths resolve against `current_dir`, which is also the base of
    /// every record's `relative_path`. Files under a directory named
    /// `dependency_dir` are flagged as dependencies.
    pub fn new(current_dir: CanonicalPath, dependency_dir: impl Into<String>) -> Self {
        Self {
            current_dir,
            dependency_dir: dependency_dir.into(),
            current: HashMap::new(),
            previous: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// The directory relative paths are resolved against.
    pub fn current_dir(&self) -> &CanonicalPath {
        &self.current_dir
    }

    /// Canonicalizes `path` against the cache's working directory.
    pub fn canonicalize(&self, path: &Path) -> CanonicalPath {
        self.current_dir.join(path)
    }

    /// Reads `path` from disk and records it in the current generation with
    /// the given root flag.
    ///
    /// Returns `None` if the file cannot be read; the miss is not an error.
    /// `parse` is only called when neither generation holds identical text.
    pub fn add_file<F>(&mut self, path: &Path, is_root: bool, parse: F) -> Option<Admitted<H>>
    where
        F: FnOnce(&Path, &str) -> H,
    {
        let canonical = self.canonicalize(path);
        let contents = self.read(&canonical)?;
        Some(self.admit(canonical, contents, Some(is_root), parse))
    }

    /// Reads `path` on behalf of the compile service.
    ///
    /// Behaves like [`add_file`](Self::add_file) but keeps the root flag of an
    /// existing current-generation record (new records are not roots).
    pub fn load<F>(&mut self, path: &Path, parse: F) -> Option<Admitted<H>>
    where
        F: FnOnce(&Path, &str) -> H,
    {
        let canonical = self.canonicalize(path);
        let contents = self.read(&canonical)?;
        Some(self.admit(canonical, contents, None, parse))
    }

    /// Records in-memory text for `path` without touching the filesystem.
    pub fn add_source<F>(
        &mut self,
        path: &Path,
        contents: impl Into<Arc<str>>,
        is_root: bool,
        parse: F,
    ) -> Admitted<H>
    where
        F: FnOnce(&Path, &str) -> H,
    {
        let canonical = self.canonicalize(path);
        self.admit(canonical, contents.into(), Some(is_root), parse)
    }

    fn read(&mut self, canonical: &CanonicalPath) -> Option<Arc<str>> {
        match std::fs::read_to_string(canonical.as_path()) {
            Ok(text) => Some(text.into()),
            Err(source) => {
                let err = CacheError::Read {
                    path: canonical.as_path().to_path_buf(),
                    source,
                };
                log::debug!("{err}");
                self.stats.read_misses += 1;
                None
            }
        }
    }

    fn admit<F>(
        &mut self,
        canonical: CanonicalPath,
        contents: Arc<str>,
        is_root: Option<bool>,
        parse: F,
    ) -> Admitted<H>
    where
        F: FnOnce(&Path, &str) -> H,
    {
        let hash = ContentHash::of_text(&contents);
        let relative_path = canonical.relative_to(&self.current_dir);
        let existing = self.current.get(&canonical);
        let is_root = is_root.unwrap_or_else(|| existing.is_some_and(|r| r.is_root));

        let (parsed, reuse) = if let Some(rec) = existing.filter(|r| r.holds(hash, &contents)) {
            self.stats.current_hits += 1;
            (rec.parsed.clone(), Reuse::Current)
        } else if let Some(rec) = self
            .previous
            .get(&canonical)
            .filter(|r| r.holds(hash, &contents))
        {
            self.stats.previous_hits += 1;
            (rec.parsed.clone(), Reuse::Previous)
        } else {
            self.stats.fresh_parses += 1;
            (parse(&relative_path, &contents), Reuse::Fresh)
        };
        log::debug!("admitted {canonical} ({reuse:?}, root: {is_root})");

        let is_dependency = self.is_dependency(&canonical);
        let observed = FileObserved {
            file: relative_path.clone(),
            canonical_path: canonical.clone(),
        };
        self.current.insert(
            canonical.clone(),
            FileRecord {
                canonical_path: canonical,
                relative_path,
                contents,
                content_hash: hash,
                parsed: parsed.clone(),
                is_root,
                is_dependency,
            },
        );

        Admitted {
            parsed,
            reuse,
            observed,
        }
    }

    fn is_dependency(&self, path: &CanonicalPath) -> bool {
        path.has_component(&self.dependency_dir)
            && FileKind::classify(path.as_path()) != FileKind::Declaration
    }

    /// Starts a new generation: the current generation becomes the previous
    /// one and the old previous generation is discarded.
    pub fn reset(&mut self) {
        log::debug!(
            "cache rollover: {} records kept as previous, {} discarded",
            self.current.len(),
            self.previous.len()
        );
        self.previous = std::mem::take(&mut self.current);
    }

    /// Looks up a current-generation record.
    pub fn get(&self, path: &CanonicalPath) -> Option<&FileRecord<H>> {
        self.current.get(path)
    }

    /// Iterates over current-generation records in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord<H>> {
        self.current.values()
    }

    /// Number of records in the current generation.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns `true` if the current generation is empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Number of records in the previous generation.
    pub fn previous_len(&self) -> usize {
        self.previous.len()
    }

    /// Canonical paths of the current generation's root files.
    pub fn root_paths(&self) -> BTreeSet<CanonicalPath> {
        self.current
            .values()
            .filter(|r| r.is_root)
            .map(|r| r.canonical_path.clone())
            .collect()
    }

    /// Canonical paths of the current generation's dependency files.
    pub fn dependency_paths(&self) -> BTreeSet<CanonicalPath> {
        self.current
            .values()
            .filter(|r| r.is_dependency)
            .map(|r| r.canonical_path.clone())
            .collect()
    }

    /// The root names handed to the compile service: roots and dependency
    /// files, sorted and deduplicated.
    pub fn root_names(&self) -> Vec<CanonicalPath> {
        let mut names = self.root_paths();
        names.extend(self.dependency_paths());
        names.into_iter().collect()
    }

    /// Compares the current generation against the previous one.
    pub fn changes(&self) -> ChangeSet {
        let current: HashMap<&CanonicalPath, ContentHash> = self
            .current
            .iter()
            .map(|(path, rec)| (path, rec.content_hash))
            .collect();
        let previous: HashMap<&CanonicalPath, ContentHash> = self
            .previous
            .iter()
            .map(|(path, rec)| (path, rec.content_hash))
            .collect();
        ChangeSet::between(&current, &previous)
    }

    /// Admission counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
