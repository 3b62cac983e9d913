//! Path identity, output-path mapping, and source text indexing.
//!
//! This crate turns arbitrary file references into a single [`CanonicalPath`]
//! identity, follows symlink chains with [`follow`], relocates paths between a
//! source root and an output directory with [`OutputPathMapper`], and converts
//! character offsets into line/column [`Location`]s through [`SourceFile`].

#![warn(missing_docs)]

pub mod canonical;
pub mod error;
pub mod file_kind;
pub mod location;
pub mod output_map;
pub mod source_file;
pub mod symlink;

pub use canonical::{canonicalize, relative_path, CanonicalPath};
pub use error::PathResolutionError;
pub use file_kind::FileKind;
pub use location::Location;
pub use output_map::OutputPathMapper;
pub use source_file::SourceFile;
pub use symlink::follow;
