//! Resolution of configured directories into absolute canonical paths.

use crate::types::{CompilerOptions, HostConfig};
use kiln_source::CanonicalPath;
use std::path::Path;

/// A host configuration with every directory made absolute and normalized.
///
/// `current_dir` resolves against the process working directory; the other
/// directories resolve against `current_dir` and fall back as documented on
/// [`PathsConfig`](crate::PathsConfig).
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory relative file names are computed from.
    pub current_dir: CanonicalPath,
    /// The logical source root.
    pub root_dir: CanonicalPath,
    /// Where compiled output is written.
    pub out_dir: CanonicalPath,
    /// Base for inline source-map `sources` entries.
    pub source_map_base: CanonicalPath,
    /// Options forwarded to the compile service.
    pub compiler: CompilerOptions,
    /// Directory name marking external dependencies.
    pub dependency_dir: String,
}

impl HostConfig {
    /// Resolves the configured directories against `process_cwd`.
    pub fn resolve(&self, process_cwd: &Path) -> ResolvedConfig {
        let paths = &self.paths;
        let current_dir = match &paths.current_dir {
            Some(dir) => CanonicalPath::new(dir, process_cwd),
            None => CanonicalPath::new(process_cwd, process_cwd),
        };
        let root_dir = paths
            .root_dir
            .as_ref()
            .map(|dir| current_dir.join(dir))
            .unwrap_or_else(|| current_dir.clone());
        let out_dir = paths
            .out_dir
            .as_ref()
            .map(|dir| current_dir.join(dir))
            .unwrap_or_else(|| root_dir.clone());
        let source_map_base = paths
            .source_map_base
            .as_ref()
            .map(|dir| current_dir.join(dir))
            .unwrap_or_else(|| current_dir.clone());

        ResolvedConfig {
            current_dir,
            root_dir,
            out_dir,
            source_map_base,
            compiler: self.compiler.clone(),
            dependency_dir: self.cache.dependency_dir.clone(),
        }
    }
}

impl ResolvedConfig {
    /// Resolves the default configuration against `process_cwd`.
    pub fn with_defaults(process_cwd: &Path) -> Self {
        HostConfig::default().resolve(process_cwd)
    }
}
