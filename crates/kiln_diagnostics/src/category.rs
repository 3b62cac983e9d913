//! Diagnostic categories as reported by the compile service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity category of a compiler diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// A potential problem that does not block emission.
    Warning,
    /// A definite problem.
    Error,
    /// An editor-style suggestion.
    Suggestion,
    /// An informational message.
    Message,
}

impl Category {
    /// Returns `true` if this category is [`Error`](Category::Error).
    pub fn is_error(self) -> bool {
        self == Category::Error
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Warning => write!(f, "Warning"),
            Category::Error => write!(f, "Error"),
            Category::Suggestion => write!(f, "Suggestion"),
            Category::Message => write!(f, "Message"),
        }
    }
}
