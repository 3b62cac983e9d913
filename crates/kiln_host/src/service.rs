//! The seam to the external compile service.
//!
//! The host never parses, type-checks, or emits code itself. It decides when
//! a program is built and which files it is built from, and it satisfies the
//! service's file-loading and file-writing hooks.

use std::path::{Path, PathBuf};

use kiln_common::KilnResult;
use kiln_config::ResolvedConfig;
use kiln_diagnostics::Diagnostic;
use kiln_source::CanonicalPath;

/// Hook through which the compile service obtains parsed source files.
///
/// Paths may be absolute or relative to the configured working directory.
/// `None` means the file does not exist or cannot be read.
pub trait SourceLoader<H> {
    /// Returns the parsed handle for `path`.
    fn read_source(&mut self, path: &Path) -> Option<H>;
}

/// Hook through which the compile service hands over compiled artifacts.
pub trait OutputWriter {
    /// Stores `data` as the content of output file `path`.
    fn write_output(&mut self, path: &Path, data: &[u8]);
}

/// Outcome of asking a program to emit.
#[derive(Debug, Clone, Default)]
pub struct EmitResult {
    /// Output files that were written through the [`OutputWriter`].
    pub written_files: Vec<PathBuf>,
    /// Diagnostics raised during emission.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether emission was skipped entirely.
    pub emit_skipped: bool,
}

/// A program built by the compile service from a set of root files.
pub trait Program {
    /// Parse errors across all files of the program.
    fn syntax_diagnostics(&self) -> Vec<Diagnostic>;
    /// Program-wide semantic diagnostics that have no file of their own.
    fn global_diagnostics(&self) -> Vec<Diagnostic>;
    /// Per-file semantic diagnostics.
    fn semantic_diagnostics(&self) -> Vec<Diagnostic>;
    /// Emits compiled output through `writer`.
    fn emit(&self, writer: &mut dyn OutputWriter) -> EmitResult;
}

/// An external compiler the host orchestrates.
pub trait CompileService {
    /// The service's parsed representation of one file.
    type Handle: Clone;
    /// The program object built from a set of roots.
    type Program: Program;

    /// Parses `contents`. `file_name` is the name diagnostics should carry.
    fn parse(&self, file_name: &Path, contents: &str) -> Self::Handle;

    /// Builds a program from `root_names`, loading every file (roots
    /// included) through `loader`.
    fn build_program(
        &self,
        root_names: &[CanonicalPath],
        config: &ResolvedConfig,
        loader: &mut dyn SourceLoader<Self::Handle>,
    ) -> KilnResult<Self::Program>;
}
