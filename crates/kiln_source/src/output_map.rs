//! Relocation of paths between the source root and the output directory.

use crate::canonical::CanonicalPath;
use crate::file_kind::FileKind;

/// Maps canonical source paths to the canonical paths their compiled output
/// is written to, and back.
///
/// A source path is expressed relative to the root directory and that
/// relative path is re-anchored at the output directory. For paths under the
/// root the two directions are exact inverses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPathMapper {
    root_dir: CanonicalPath,
    out_dir: CanonicalPath,
}

impl OutputPathMapper {
    /// Creates a mapper. The output directory defaults to the root directory.
    pub fn new(root_dir: CanonicalPath, out_dir: Option<CanonicalPath>) -> Self {
        let out_dir = out_dir.unwrap_or_else(|| root_dir.clone());
        Self { root_dir, out_dir }
    }

    /// The logical source root.
    pub fn root_dir(&self) -> &CanonicalPath {
        &self.root_dir
    }

    /// The output directory.
    pub fn out_dir(&self) -> &CanonicalPath {
        &self.out_dir
    }

    /// Relocates a source path under the output directory.
    pub fn to_output(&self, source: &CanonicalPath) -> CanonicalPath {
        self.out_dir.join(source.relative_to(&self.root_dir))
    }

    /// Relocates an output path back under the root directory.
    pub fn to_source(&self, output: &CanonicalPath) -> CanonicalPath {
        self.root_dir.join(output.relative_to(&self.out_dir))
    }

    /// The output key a compiled `source` is stored under: relocated to the
    /// output directory with its extension swapped for the compiled one.
    pub fn output_key(&self, source: &CanonicalPath, preserve_jsx: bool) -> CanonicalPath {
        let ext = FileKind::classify(source.as_path()).output_extension(preserve_jsx);
        self.to_output(&source.replace_extension(ext))
    }
}
