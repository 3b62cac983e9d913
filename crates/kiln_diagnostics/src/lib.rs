//! Compiler diagnostics and their translation into addressable errors.
//!
//! The compile service reports findings as [`Diagnostic`] records: a
//! [`Category`], a numeric [`DiagnosticCode`], a possibly nested
//! [`DiagnosticMessage`], and an optional location inside a
//! [`SourceFile`](kiln_source::SourceFile). [`translate`] flattens such a
//! record into a [`CompileError`] with file, line, and column fields.

#![warn(missing_docs)]

pub mod category;
pub mod code;
pub mod diagnostic;
pub mod message;
pub mod translate;

pub use category::Category;
pub use code::DiagnosticCode;
pub use diagnostic::{Diagnostic, DiagnosticLocation};
pub use message::{DiagnosticMessage, MessageChain, LINE_SEPARATOR};
pub use translate::{translate, CompileError};
