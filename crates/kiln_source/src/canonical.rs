//! Canonical path identity.
//!
//! A [`CanonicalPath`] is the one key every file is known by inside the cache,
//! regardless of whether the build tool referred to it with a relative path,
//! an absolute path, or a path containing `.` and `..` segments. Canonicalizing
//! is purely lexical: it never touches the filesystem and never follows links.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// An absolute, lexically normalized path used as a file identity key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(PathBuf);

impl CanonicalPath {
    /// Canonicalizes `path` against `base_dir`.
    ///
    /// Equivalent to [`canonicalize`]; provided for call sites that read better
    /// as a constructor.
    pub fn new(path: impl AsRef<Path>, base_dir: &Path) -> Self {
        canonicalize(path.as_ref(), base_dir)
    }

    /// Canonicalizes `path` against the process working directory.
    pub fn from_cwd(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(canonicalize(path.as_ref(), &cwd))
    }

    /// Returns the underlying path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consumes the identity and returns the owned path.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Resolves a (possibly relative) path against this directory.
    pub fn join(&self, path: impl AsRef<Path>) -> CanonicalPath {
        canonicalize(path.as_ref(), &self.0)
    }

    /// Returns this path expressed relative to `base`.
    pub fn relative_to(&self, base: &CanonicalPath) -> PathBuf {
        relative_path(&base.0, &self.0)
    }

    /// Returns the parent directory, or `None` at the filesystem root.
    pub fn parent(&self) -> Option<CanonicalPath> {
        self.0.parent().map(|p| CanonicalPath(p.to_path_buf()))
    }

    /// Replaces the final extension, leaving extension-less paths unchanged.
    pub fn replace_extension(&self, extension: &str) -> CanonicalPath {
        if self.0.extension().is_some() {
            CanonicalPath(self.0.with_extension(extension.trim_start_matches('.')))
        } else {
            self.clone()
        }
    }

    /// Returns `true` if any directory component equals `name`.
    pub fn has_component(&self, name: &str) -> bool {
        self.0
            .parent()
            .map(|dir| dir.components().any(|c| c.as_os_str() == name))
            .unwrap_or(false)
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl fmt::Debug for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalPath({})", self.0.display())
    }
}

/// Resolves `path` against `base_dir` and normalizes `.`/`..` segments and
/// repeated separators.
///
/// `base_dir` is expected to be absolute. A `..` at the filesystem root stays
/// at the root.
pub fn canonicalize(path: &Path, base_dir: &Path) -> CanonicalPath {
    let joined;
    let full = if path.is_absolute() {
        path
    } else {
        joined = base_dir.join(path);
        joined.as_path()
    };

    let mut out = PathBuf::new();
    for component in full.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_anchor = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_anchor {
                    out.pop();
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    CanonicalPath(out)
}

/// Computes the lexical path leading from directory `from` to `to`.
///
/// Both inputs should already be normalized. When the two paths share no
/// anchor (different drive prefixes), `to` is returned unchanged.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    if from_parts.first() != to_parts.first() {
        return to.to_path_buf();
    }

    let shared = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in shared..from_parts.len() {
        rel.push("..");
    }
    for part in &to_parts[shared..] {
        rel.push(part.as_os_str());
    }
    rel
}
