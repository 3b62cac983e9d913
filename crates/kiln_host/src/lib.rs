//! Incremental compile host.
//!
//! [`Host`] sits between a build driver and an external [`CompileService`].
//! The driver adds entry files, asks for a compile, and pulls compiled output
//! back per file. The host routes every source read through a two-generation
//! [`FileCache`](kiln_cache::FileCache), every output write through an
//! [`OutputPathMapper`](kiln_source::OutputPathMapper), and every diagnostic
//! through [`translate`](kiln_diagnostics::translate) onto its event channel.

#![warn(missing_docs)]

pub mod entry;
pub mod error;
pub mod events;
pub mod host;
pub mod service;
pub mod sourcemap;

mod hooks;

pub use entry::{gather_entries, EntryRow, GatheredEntries};
pub use error::HostError;
pub use events::{EventLog, EventSink, HostEvent};
pub use host::{CompileSummary, GenerationState, Host, Transformed};
pub use service::{CompileService, EmitResult, OutputWriter, Program, SourceLoader};
pub use sourcemap::{InlineSourceMapRewriter, SourceMapError, SourceMapRewriter};
