//! Diagnostic records produced by the compile service.

use crate::category::Category;
use crate::code::DiagnosticCode;
use crate::message::DiagnosticMessage;
use kiln_source::SourceFile;
use std::sync::Arc;

/// Where a diagnostic points: a parsed file and a character offset into its text.
#[derive(Clone, Debug)]
pub struct DiagnosticLocation {
    /// The file the diagnostic refers to.
    pub file: Arc<SourceFile>,
    /// Character offset of the start of the reported range.
    pub start: u32,
}

/// A finding reported by the compile service.
///
/// Diagnostics without a location are program-global (for example, a missing
/// standard library) and have no file, line, or column.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The severity category.
    pub category: Category,
    /// The numeric code.
    pub code: DiagnosticCode,
    /// The (possibly nested) message.
    pub message: DiagnosticMessage,
    /// The source location, if any.
    pub location: Option<DiagnosticLocation>,
}

impl Diagnostic {
    /// Creates a program-global error diagnostic.
    pub fn error(code: u32, message: impl Into<DiagnosticMessage>) -> Self {
        Self {
            category: Category::Error,
            code: DiagnosticCode::new(code),
            message: message.into(),
            location: None,
        }
    }

    /// Creates a program-global warning diagnostic.
    pub fn warning(code: u32, message: impl Into<DiagnosticMessage>) -> Self {
        Self {
            category: Category::Warning,
            code: DiagnosticCode::new(code),
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a location in `file` at character offset `start`.
    pub fn at(mut self, file: Arc<SourceFile>, start: u32) -> Self {
        self.location = Some(DiagnosticLocation { file, start });
        self
    }

    /// Returns `true` if this diagnostic points into a file.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}
