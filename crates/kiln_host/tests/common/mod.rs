//! A toy compile service for driving [`Host`] end to end.
//!
//! Its language is TypeScript-shaped text with a few rules:
//!
//! - a line `import "<path>"` pulls another file into the program, resolved
//!   against the importing file's directory;
//! - the marker `@@` anywhere is a syntax error;
//! - `const <name>: number = "<text>"` is a type error at `<name>`;
//! - the marker `@nolib` raises a global (location-less) error;
//! - the marker `@unused` is a semantic warning;
//! - the marker `@emit-error` is an error reported while emitting, after the
//!   file has been written.
//!
//! Emission writes `"use strict";` followed by the source text, plus an inline
//! source map when configured. Declaration files are never emitted.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kiln_common::KilnResult;
use kiln_config::{HostConfig, ResolvedConfig};
use kiln_diagnostics::Diagnostic;
use kiln_host::{CompileService, EmitResult, Host, OutputWriter, Program, SourceLoader};
use kiln_source::{CanonicalPath, FileKind, OutputPathMapper, SourceFile};

/// A parsed toy file.
#[derive(Debug)]
pub struct ToyFile {
    pub source: Arc<SourceFile>,
    pub imports: Vec<String>,
}

pub type Handle = Arc<ToyFile>;

/// The toy service, counting every parse it performs.
#[derive(Default)]
pub struct ToyService {
    parses: Cell<usize>,
    parsed_names: RefCell<Vec<PathBuf>>,
}

impl ToyService {
    /// Total number of parses.
    pub fn parses(&self) -> usize {
        self.parses.get()
    }

    /// Names handed to the parser, in order.
    pub fn parsed_names(&self) -> Vec<PathBuf> {
        self.parsed_names.borrow().clone()
    }

    /// Forgets the parse log, keeping the count.
    pub fn clear_parsed_names(&self) {
        self.parsed_names.borrow_mut().clear();
    }
}

impl CompileService for ToyService {
    type Handle = Handle;
    type Program = ToyProgram;

    fn parse(&self, file_name: &Path, contents: &str) -> Handle {
        self.parses.set(self.parses.get() + 1);
        self.parsed_names.borrow_mut().push(file_name.to_path_buf());

        let imports = contents
            .lines()
            .filter_map(|line| {
                let rest = line.trim().strip_prefix("import \"")?;
                rest.split('"').next().map(str::to_string)
            })
            .collect();
        Arc::new(ToyFile {
            source: Arc::new(SourceFile::new(file_name, contents)),
            imports,
        })
    }

    fn build_program(
        &self,
        root_names: &[CanonicalPath],
        config: &ResolvedConfig,
        loader: &mut dyn SourceLoader<Handle>,
    ) -> KilnResult<ToyProgram> {
        let mut queue: VecDeque<CanonicalPath> = root_names.iter().cloned().collect();
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        while let Some(path) = queue.pop_front() {
            if !seen.insert(path.clone()) {
                continue;
            }
            let Some(file) = loader.read_source(path.as_path()) else {
                continue;
            };
            if let Some(dir) = path.parent() {
                queue.extend(file.imports.iter().map(|import| dir.join(import)));
            }
            files.push((path, file));
        }

        Ok(ToyProgram {
            files,
            mapper: OutputPathMapper::new(config.root_dir.clone(), Some(config.out_dir.clone())),
            preserve_jsx: config.compiler.jsx.preserves_jsx(),
            no_emit_on_error: config.compiler.no_emit_on_error,
            inline_source_map: config.compiler.inline_source_map,
        })
    }
}

/// A program over every file reachable from the roots.
pub struct ToyProgram {
    files: Vec<(CanonicalPath, Handle)>,
    mapper: OutputPathMapper,
    preserve_jsx: bool,
    no_emit_on_error: bool,
    inline_source_map: bool,
}

fn type_error_offset(line: &str) -> Option<usize> {
    let rest = line.strip_prefix("const ")?;
    let (name, value) = rest.split_once(": number = \"")?;
    (!name.is_empty() && value.contains('"')).then_some("const ".len())
}

/// Character offset of the first occurrence of `marker` in `file`.
fn marker_offset(file: &ToyFile, marker: &str) -> Option<u32> {
    let byte = file.source.content.find(marker)?;
    Some(file.source.char_offset(byte))
}

impl ToyProgram {
    fn marked(&self, marker: &str, make: impl Fn() -> Diagnostic) -> Vec<Diagnostic> {
        self.files
            .iter()
            .filter_map(|(_, file)| {
                let offset = marker_offset(file, marker)?;
                Some(make().at(file.source.clone(), offset))
            })
            .collect()
    }
}

impl Program for ToyProgram {
    fn syntax_diagnostics(&self) -> Vec<Diagnostic> {
        self.marked("@@", || Diagnostic::error(1005, "';' expected."))
    }

    fn global_diagnostics(&self) -> Vec<Diagnostic> {
        if self.files.iter().any(|(_, f)| f.source.content.contains("@nolib")) {
            vec![Diagnostic::error(2318, "Cannot find global type 'Array'.")]
        } else {
            Vec::new()
        }
    }

    fn semantic_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (_, file) in &self.files {
            let mut line_start = 0;
            for line in file.source.content.split_inclusive('\n') {
                if let Some(offset) = type_error_offset(line) {
                    diagnostics.push(
                        Diagnostic::error(2322, "Type 'string' is not assignable to type 'number'.")
                            .at(file.source.clone(), file.source.char_offset(line_start + offset)),
                    );
                }
                line_start += line.len();
            }
        }
        diagnostics.extend(self.marked("@unused", || {
            Diagnostic::warning(6133, "'x' is declared but its value is never read.")
        }));
        diagnostics
    }

    fn emit(&self, writer: &mut dyn OutputWriter) -> EmitResult {
        let mut result = EmitResult::default();
        if self.no_emit_on_error && !self.semantic_diagnostics().is_empty() {
            result.emit_skipped = true;
            return result;
        }

        for (path, file) in &self.files {
            if FileKind::classify(path.as_path()) == FileKind::Declaration {
                continue;
            }
            let out = self.mapper.output_key(path, self.preserve_jsx);
            let mut text = format!("\"use strict\";\n{}", file.source.content);
            if self.inline_source_map {
                let name = file.source.path.file_name().unwrap_or_default();
                let map = format!(
                    r#"{{"version":3,"file":"out.js","sources":["{}"],"mappings":"AAAA"}}"#,
                    name.to_string_lossy()
                );
                text.push_str("\n//# sourceMappingURL=data:application/json;base64,");
                text.push_str(&STANDARD.encode(map));
            }
            writer.write_output(out.as_path(), text.as_bytes());
            result.written_files.push(out.into_path_buf());
        }
        result.diagnostics = self.marked("@emit-error", || {
            Diagnostic::error(5033, "Could not write file.")
        });
        result
    }
}

/// A temporary project directory with its canonical path.
pub struct Project {
    pub dir: tempfile::TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        Self { dir, root }
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// A host over this project with default options.
    pub fn host(&self) -> Host<ToyService> {
        self.host_with(HostConfig::default())
    }

    /// A host over this project with `config`.
    pub fn host_with(&self, config: HostConfig) -> Host<ToyService> {
        Host::new(ToyService::default(), config.resolve(&self.root))
    }

    /// A host configured from `kiln.toml` text.
    pub fn host_from_toml(&self, toml: &str) -> Host<ToyService> {
        self.host_with(kiln_config::load_config_from_str(toml).unwrap())
    }
}

/// Decodes the `sources` field of an inline source map in `output`.
pub fn inline_sources(output: &[u8]) -> serde_json::Value {
    let text = std::str::from_utf8(output).unwrap();
    let payload = text.rsplit_once("base64,").unwrap().1.trim();
    let map: serde_json::Value = serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();
    map["sources"].clone()
}

/// Parses counted per file name.
pub fn parse_counts(service: &ToyService) -> HashMap<PathBuf, usize> {
    let mut counts = HashMap::new();
    for name in service.parsed_names() {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}
