//! The compile orchestrator.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use kiln_cache::FileCache;
use kiln_config::{HostConfig, ResolvedConfig};
use kiln_diagnostics::{translate, Diagnostic};
use kiln_source::{CanonicalPath, FileKind, OutputPathMapper};

use crate::entry::{gather_entries, EntryRow, GatheredEntries};
use crate::error::HostError;
use crate::events::{EventSink, HostEvent, Listeners};
use crate::hooks::{CacheLoader, MappedWriter};
use crate::service::{CompileService, Program};
use crate::sourcemap::{InlineSourceMapRewriter, SourceMapRewriter};

/// Where the host is within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// No compile pass has run since the last reset. Files may be added.
    Idle,
    /// A compile pass has run. Output can be retrieved.
    Compiled,
}

/// What a compile pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Syntax diagnostics reported. Any syntax diagnostic ends the pass.
    pub syntax: usize,
    /// Global or per-file semantic diagnostics reported.
    pub semantic: usize,
    /// Diagnostics raised during emission.
    pub emit: usize,
    /// Output files the service wrote.
    pub written: usize,
    /// Whether emission did not happen.
    pub emit_skipped: bool,
}

impl CompileSummary {
    /// Total number of diagnostics reported by the pass.
    pub fn diagnostics(&self) -> usize {
        self.syntax + self.semantic + self.emit
    }
}

/// The result of [`Host::transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    /// The file compiles to nothing: a declaration file, or a compiled kind
    /// in a generation that already failed.
    Empty,
    /// Compiled output for the file.
    Compiled(Vec<u8>),
    /// The host does not compile this kind of file.
    PassThrough,
}

/// Incremental compile host for one build driver.
///
/// A generation runs as: [`add_file`](Self::add_file) for every entry,
/// [`compile`](Self::compile) (or let [`retrieve_output`](Self::retrieve_output)
/// trigger it), fetch outputs, then [`reset`](Self::reset) before the next
/// build. Parsed files survive a reset and are reused for any file whose text
/// is unchanged.
pub struct Host<S: CompileService> {
    service: S,
    config: ResolvedConfig,
    cache: FileCache<S::Handle>,
    mapper: OutputPathMapper,
    outputs: HashMap<CanonicalPath, Vec<u8>>,
    state: GenerationState,
    has_error: bool,
    compile_count: usize,
    retried: HashSet<CanonicalPath>,
    listeners: Listeners,
    rewriter: Box<dyn SourceMapRewriter>,
}

impl<S: CompileService> Host<S> {
    /// Creates a host with an empty cache.
    pub fn new(service: S, config: ResolvedConfig) -> Self {
        let cache = FileCache::new(config.current_dir.clone(), config.dependency_dir.clone());
        let mapper = OutputPathMapper::new(config.root_dir.clone(), Some(config.out_dir.clone()));
        Self {
            service,
            config,
            cache,
            mapper,
            outputs: HashMap::new(),
            state: GenerationState::Idle,
            has_error: false,
            compile_count: 0,
            retried: HashSet::new(),
            listeners: Listeners::default(),
            rewriter: Box::new(InlineSourceMapRewriter),
        }
    }

    /// Creates a host, resolving `config` against the process working
    /// directory.
    pub fn from_config(service: S, config: &HostConfig) -> Result<Self, HostError> {
        let cwd = std::env::current_dir().map_err(HostError::WorkingDirectory)?;
        Ok(Self::new(service, config.resolve(&cwd)))
    }

    /// Replaces the inline source map rewriter.
    pub fn with_rewriter(mut self, rewriter: impl SourceMapRewriter + 'static) -> Self {
        self.rewriter = Box::new(rewriter);
        self
    }

    /// Registers a listener for file and error events.
    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.listeners.subscribe(Box::new(sink));
    }

    /// Adds a file to the current generation and returns its parsed handle.
    ///
    /// `Ok(None)` means the file could not be read. That is not an error here;
    /// a missing root simply produces no output later.
    pub fn add_file(&mut self, path: &Path, is_root: bool) -> Result<Option<S::Handle>, HostError> {
        if self.state == GenerationState::Compiled {
            return Err(HostError::AddAfterCompile {
                path: path.to_path_buf(),
            });
        }

        let service = &self.service;
        match self
            .cache
            .add_file(path, is_root, |name, contents| service.parse(name, contents))
        {
            Some(admitted) => {
                self.listeners.dispatch(HostEvent::File(admitted.observed));
                Ok(Some(admitted.parsed))
            }
            None => {
                if is_root {
                    log::warn!("cannot read root file {}", path.display());
                }
                Ok(None)
            }
        }
    }

    /// Adds the entry files named by `rows` as roots.
    pub fn add_entries(&mut self, rows: &[EntryRow]) -> Result<GatheredEntries, HostError> {
        let gathered = gather_entries(rows);
        for entry in &gathered.entries {
            self.add_file(entry, true)?;
        }
        if !gathered.ignored.is_empty() {
            log::debug!("ignored {} entry rows", gathered.ignored.len());
        }
        Ok(gathered)
    }

    /// Starts a new generation.
    ///
    /// Outputs, the error flag and the retry bookkeeping are cleared. Parsed
    /// files move to the previous generation where they wait to be reused.
    pub fn reset(&mut self) {
        self.outputs.clear();
        self.retried.clear();
        self.has_error = false;
        self.compile_count = 0;
        self.state = GenerationState::Idle;
        self.cache.reset();
    }

    /// Runs one compile pass over the current roots and dependency files.
    ///
    /// Diagnostics are delivered to listeners, not returned. A syntax
    /// diagnostic ends the pass before semantic checking. With
    /// `no_emit_on_error`, any semantic or emit diagnostic is fatal for the
    /// generation, whatever its category, and semantic ones prevent emission.
    pub fn compile(&mut self) -> Result<CompileSummary, HostError> {
        let root_names = self.cache.root_names();
        log::info!("compiling {} root files", root_names.len());
        self.state = GenerationState::Compiled;
        self.compile_count += 1;

        let program = {
            let mut loader = CacheLoader {
                service: &self.service,
                cache: &mut self.cache,
                listeners: &mut self.listeners,
            };
            self.service
                .build_program(&root_names, &self.config, &mut loader)?
        };
        let fail_fast = self.config.compiler.no_emit_on_error;
        let mut summary = CompileSummary::default();

        let syntax = program.syntax_diagnostics();
        summary.syntax = syntax.len();
        if !syntax.is_empty() {
            self.has_error = true;
            self.report(&syntax);
            summary.emit_skipped = true;
            log::info!("compile stopped after {} syntax errors", summary.syntax);
            return Ok(summary);
        }

        let mut semantic = program.global_diagnostics();
        if semantic.is_empty() {
            semantic = program.semantic_diagnostics();
        }
        summary.semantic = semantic.len();
        self.report(&semantic);
        if fail_fast && !semantic.is_empty() {
            self.has_error = true;
        }
        log::debug!("{} semantic diagnostics", summary.semantic);

        if self.has_error {
            summary.emit_skipped = true;
        } else {
            let result = {
                let mut writer = MappedWriter {
                    current_dir: &self.config.current_dir,
                    mapper: &self.mapper,
                    outputs: &mut self.outputs,
                };
                program.emit(&mut writer)
            };
            summary.emit = result.diagnostics.len();
            summary.written = result.written_files.len();
            summary.emit_skipped = result.emit_skipped;
            self.report(&result.diagnostics);
            if fail_fast && !result.diagnostics.is_empty() {
                self.has_error = true;
            }
        }

        log::info!(
            "compile finished: {} diagnostics, {} files written",
            summary.diagnostics(),
            summary.written
        );
        Ok(summary)
    }

    fn report(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.listeners.dispatch(HostEvent::Error(translate(diagnostic)));
        }
    }

    fn output_key(&self, source: &CanonicalPath) -> CanonicalPath {
        self.mapper
            .output_key(source, self.config.compiler.jsx.preserves_jsx())
    }

    /// Stored output for `source`, as emitted. Never compiles.
    pub fn output(&self, source: &Path) -> Option<&[u8]> {
        let key = self.output_key(&self.cache.canonicalize(source));
        self.outputs.get(&key).map(Vec::as_slice)
    }

    /// Compiled output for `file`, compiling first if needed.
    ///
    /// A missing output triggers at most one compile pass per output key; if
    /// that pass does not produce it either, the result is
    /// [`HostError::NoOutput`]. Once the generation has failed, nothing is
    /// compiled and [`HostError::CompileFailed`] is returned.
    pub fn retrieve_output(&mut self, file: &Path) -> Result<Vec<u8>, HostError> {
        let failed = || HostError::CompileFailed {
            file: file.to_path_buf(),
        };
        if self.has_error {
            return Err(failed());
        }

        let source = self.cache.canonicalize(file);
        let key = self.output_key(&source);
        if !self.outputs.contains_key(&key) && self.retried.insert(key.clone()) {
            log::debug!("no output at {key} yet, compiling");
            self.compile()?;
            if self.has_error {
                return Err(failed());
            }
        }

        let data = self.outputs.get(&key).ok_or_else(|| HostError::NoOutput {
            file: file.to_path_buf(),
        })?;
        Ok(self.rewrite_source_map(&source, data))
    }

    fn rewrite_source_map(&self, source: &CanonicalPath, data: &[u8]) -> Vec<u8> {
        if !self.config.compiler.inline_source_map {
            return data.to_vec();
        }
        let Ok(text) = std::str::from_utf8(data) else {
            log::warn!("output for {source} is not UTF-8, source map left as is");
            return data.to_vec();
        };

        let relative = source.relative_to(&self.config.source_map_base);
        match self.rewriter.rewrite_sources(text, &relative) {
            Ok(rewritten) => rewritten.into_bytes(),
            Err(err) => {
                log::warn!("cannot rewrite source map for {source}: {err}");
                data.to_vec()
            }
        }
    }

    /// Compiles `file` if the host handles its kind.
    ///
    /// Declaration files produce nothing. TypeScript files, and JavaScript
    /// files when `allow_js` is set, produce their compiled output. Everything
    /// else passes through.
    pub fn transform(&mut self, file: &Path) -> Result<Transformed, HostError> {
        let compiles = match FileKind::classify(file) {
            FileKind::Declaration => return Ok(Transformed::Empty),
            FileKind::TypeScript | FileKind::Tsx => true,
            FileKind::JavaScript => self.config.compiler.allow_js,
            FileKind::Other => false,
        };

        if !compiles {
            Ok(Transformed::PassThrough)
        } else if self.has_error {
            Ok(Transformed::Empty)
        } else {
            self.retrieve_output(file).map(Transformed::Compiled)
        }
    }

    /// Whether a fatal diagnostic was raised in this generation.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Compile passes run in this generation.
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    /// The generation state.
    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// The file cache.
    pub fn cache(&self) -> &FileCache<S::Handle> {
        &self.cache
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The source-to-output path mapper.
    pub fn mapper(&self) -> &OutputPathMapper {
        &self.mapper
    }

    /// The compile service.
    pub fn service(&self) -> &S {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{EmitResult, OutputWriter, SourceLoader};
    use kiln_common::{InternalError, KilnResult};
    use std::path::PathBuf;

    /// Emits `// <relative path>` for every readable root.
    struct Echo {
        fail_build: bool,
    }

    struct EchoProgram {
        outputs: Vec<(PathBuf, String)>,
    }

    impl Program for EchoProgram {
        fn syntax_diagnostics(&self) -> Vec<Diagnostic> {
            Vec::new()
        }

        fn global_diagnostics(&self) -> Vec<Diagnostic> {
            Vec::new()
        }

        fn semantic_diagnostics(&self) -> Vec<Diagnostic> {
            Vec::new()
        }

        fn emit(&self, writer: &mut dyn OutputWriter) -> EmitResult {
            let mut result = EmitResult::default();
            for (path, text) in &self.outputs {
                writer.write_output(path, text.as_bytes());
                result.written_files.push(path.clone());
            }
            result
        }
    }

    impl CompileService for Echo {
        type Handle = PathBuf;
        type Program = EchoProgram;

        fn parse(&self, file_name: &Path, _contents: &str) -> PathBuf {
            file_name.to_path_buf()
        }

        fn build_program(
            &self,
            root_names: &[CanonicalPath],
            config: &ResolvedConfig,
            loader: &mut dyn SourceLoader<PathBuf>,
        ) -> KilnResult<EchoProgram> {
            if self.fail_build {
                return Err(InternalError::new("service unavailable"));
            }
            let mapper = OutputPathMapper::new(config.root_dir.clone(), Some(config.out_dir.clone()));
            let outputs = root_names
                .iter()
                .filter_map(|root| {
                    let name = loader.read_source(root.as_path())?;
                    let out = mapper.output_key(root, false);
                    Some((out.into_path_buf(), format!("// {}", name.display())))
                })
                .collect();
            Ok(EchoProgram { outputs })
        }
    }

    fn host(dir: &Path) -> Host<Echo> {
        let cwd = std::fs::canonicalize(dir).unwrap();
        Host::new(Echo { fail_build: false }, ResolvedConfig::with_defaults(&cwd))
    }

    #[test]
    fn output_is_compiled_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "let a = 1;").unwrap();
        let mut host = host(dir.path());

        host.add_file(Path::new("a.ts"), true).unwrap();
        assert_eq!(host.output(Path::new("a.ts")), None);
        assert_eq!(host.state(), GenerationState::Idle);

        let out = host.retrieve_output(Path::new("a.ts")).unwrap();
        assert_eq!(out, b"// a.ts");
        assert_eq!(host.compile_count(), 1);
        assert_eq!(host.state(), GenerationState::Compiled);
        assert_eq!(host.output(Path::new("a.ts")), Some(&b"// a.ts"[..]));
    }

    #[test]
    fn add_after_compile_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "").unwrap();
        let mut host = host(dir.path());

        host.compile().unwrap();
        let err = host.add_file(Path::new("a.ts"), true).unwrap_err();
        assert!(matches!(err, HostError::AddAfterCompile { .. }));

        host.reset();
        assert!(host.add_file(Path::new("a.ts"), true).unwrap().is_some());
    }

    #[test]
    fn unreadable_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = host(dir.path());

        assert_eq!(host.add_file(Path::new("missing.ts"), true).unwrap(), None);
        assert!(host.cache().is_empty());
    }

    #[test]
    fn reset_clears_outputs_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "").unwrap();
        let mut host = host(dir.path());
        host.add_file(Path::new("a.ts"), true).unwrap();
        host.compile().unwrap();
        assert!(host.output(Path::new("a.ts")).is_some());

        host.reset();
        assert_eq!(host.output(Path::new("a.ts")), None);
        assert_eq!(host.compile_count(), 0);
        assert_eq!(host.state(), GenerationState::Idle);
        assert!(host.cache().is_empty());
        assert_eq!(host.cache().previous_len(), 1);
    }

    #[test]
    fn service_failure_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = std::fs::canonicalize(dir.path()).unwrap();
        let mut host = Host::new(Echo { fail_build: true }, ResolvedConfig::with_defaults(&cwd));

        let err = host.compile().unwrap_err();
        assert!(matches!(err, HostError::Internal(_)));
    }

    #[test]
    fn transform_gates_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "").unwrap();
        std::fs::write(dir.path().join("b.js"), "").unwrap();
        let mut host = host(dir.path());
        host.add_file(Path::new("a.ts"), true).unwrap();

        assert_eq!(host.transform(Path::new("types.d.ts")).unwrap(), Transformed::Empty);
        assert_eq!(host.transform(Path::new("b.js")).unwrap(), Transformed::PassThrough);
        assert_eq!(host.transform(Path::new("style.css")).unwrap(), Transformed::PassThrough);
        assert_eq!(host.compile_count(), 0);

        assert_eq!(
            host.transform(Path::new("a.ts")).unwrap(),
            Transformed::Compiled(b"// a.ts".to_vec())
        );
    }

    #[test]
    fn summary_counts_written_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "").unwrap();
        std::fs::write(dir.path().join("b.ts"), "").unwrap();
        let mut host = host(dir.path());
        host.add_file(Path::new("a.ts"), true).unwrap();
        host.add_file(Path::new("b.ts"), true).unwrap();

        let summary = host.compile().unwrap();
        assert_eq!(summary.written, 2);
        assert_eq!(summary.diagnostics(), 0);
        assert!(!summary.emit_skipped);
    }
}
