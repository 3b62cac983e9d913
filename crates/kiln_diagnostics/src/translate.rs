//! Translation of compiler diagnostics into addressable errors.

use crate::category::Category;
use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::message::LINE_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A compiler diagnostic flattened into a structured error.
///
/// `file_name`, `line` and `column` are all `Some` when the diagnostic pointed
/// into a file and all `None` for program-global diagnostics. Line and column
/// are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    /// The severity category.
    pub category: Category,
    /// The numeric code.
    pub code: DiagnosticCode,
    /// The flattened message text.
    pub message: String,
    /// The file the diagnostic points into.
    pub file_name: Option<PathBuf>,
    /// The 1-based line.
    pub line: Option<u32>,
    /// The 1-based column.
    pub column: Option<u32>,
}

impl CompileError {
    /// The message without location: `"<Category> <Code>: <Message>"`.
    pub fn summary(&self) -> String {
        format!("{} {}: {}", self.category, self.code, self.message)
    }

    /// Returns `true` if the error carries a file location.
    pub fn has_location(&self) -> bool {
        self.file_name.is_some()
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(file), Some(line), Some(column)) = (&self.file_name, self.line, self.column) {
            write!(f, "{}({},{}): ", file.display(), line, column)?;
        }
        write!(f, "{} {}: {}", self.category, self.code, self.message)
    }
}

impl std::error::Error for CompileError {}

impl From<&Diagnostic> for CompileError {
    fn from(diagnostic: &Diagnostic) -> Self {
        translate(diagnostic)
    }
}

/// Converts a diagnostic into a [`CompileError`].
///
/// Nested messages are joined with the platform line separator. When the
/// diagnostic has a location, its character offset is resolved against the file's
/// text into a 1-based line and column.
pub fn translate(diagnostic: &Diagnostic) -> CompileError {
    let message = diagnostic.message.flatten(LINE_SEPARATOR);

    let (file_name, line, column) = match &diagnostic.location {
        Some(loc) => {
            let resolved = loc.file.location(loc.start);
            (Some(resolved.file_path), Some(resolved.line), Some(resolved.column))
        }
        None => (None, None, None),
    };

    CompileError {
        category: diagnostic.category,
        code: diagnostic.code,
        message,
        file_name,
        line,
        column,
    }
}
