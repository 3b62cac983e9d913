//! Configuration types deserialized from `kiln.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level host configuration parsed from `kiln.toml`.
///
/// Every section is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
    /// Directory layout.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Options forwarded to the compile service.
    #[serde(default)]
    pub compiler: CompilerOptions,
    /// File cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Directory layout. Relative entries resolve against `current_dir`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Working directory relative file names are computed from. Defaults to
    /// the process working directory.
    #[serde(default)]
    pub current_dir: Option<PathBuf>,
    /// The logical source root. Defaults to `current_dir`.
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    /// Where compiled output is written. Defaults to `root_dir`.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    /// Base directory that inline source-map `sources` entries are made
    /// relative to. Defaults to `current_dir`.
    #[serde(default)]
    pub source_map_base: Option<PathBuf>,
}

/// Compiler options that the host itself interprets, plus an opaque table
/// passed through to the compile service untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOptions {
    /// Treat any semantic or emit diagnostic, warnings included, as fatal for
    /// the generation, and skip emission once a semantic one is reported.
    #[serde(default)]
    pub no_emit_on_error: bool,
    /// Whether compiled output carries an inline source map to rewrite.
    #[serde(default)]
    pub inline_source_map: bool,
    /// Whether JavaScript inputs are compiled too.
    #[serde(default)]
    pub allow_js: bool,
    /// JSX handling mode.
    #[serde(default)]
    pub jsx: JsxEmit,
    /// Module system of the emitted code.
    #[serde(default)]
    pub module: ModuleKind,
    /// Additional options the host does not interpret.
    #[serde(default)]
    pub extra: toml::Table,
}

/// How JSX in `.tsx` files is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JsxEmit {
    /// JSX is not supported.
    #[default]
    None,
    /// JSX is kept as-is and the output gets a `.jsx` extension.
    Preserve,
    /// JSX is compiled to `React.createElement` calls.
    React,
    /// JSX is compiled to `_jsx` calls from the automatic runtime.
    ReactJsx,
    /// JSX is kept as-is but the output gets a `.js` extension.
    ReactNative,
}

impl JsxEmit {
    /// Returns `true` when `.tsx` output keeps a `.jsx` extension.
    pub fn preserves_jsx(self) -> bool {
        self == JsxEmit::Preserve
    }
}

/// Module system of the emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// CommonJS `require`/`exports`.
    #[default]
    CommonJs,
    /// AMD `define`.
    Amd,
    /// UMD wrapper.
    Umd,
    /// SystemJS `System.register`.
    System,
    /// ES2015 modules.
    Es2015,
    /// ES2020 modules.
    Es2020,
    /// Latest ES modules.
    EsNext,
    /// Node16 resolution-aware output.
    Node16,
    /// NodeNext resolution-aware output.
    NodeNext,
}

/// File cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory name marking external dependencies (force-included roots).
    #[serde(default = "default_dependency_dir")]
    pub dependency_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dependency_dir: default_dependency_dir(),
        }
    }
}

fn default_dependency_dir() -> String {
    "node_modules".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HostConfig::default();
        assert!(config.paths.current_dir.is_none());
        assert!(!config.compiler.no_emit_on_error);
        assert_eq!(config.compiler.jsx, JsxEmit::None);
        assert_eq!(config.compiler.module, ModuleKind::CommonJs);
        assert_eq!(config.cache.dependency_dir, "node_modules");
    }

    #[test]
    fn only_preserve_keeps_jsx_extension() {
        assert!(JsxEmit::Preserve.preserves_jsx());
        assert!(!JsxEmit::React.preserves_jsx());
        assert!(!JsxEmit::ReactNative.preserves_jsx());
    }
}
