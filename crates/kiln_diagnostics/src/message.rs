//! Diagnostic message text, possibly composed of nested sub-messages.

/// The platform line separator used when flattening message chains.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// The platform line separator used when flattening message chains.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// One link of a nested diagnostic message.
///
/// Each link elaborates on its parent, e.g. "Type 'A' is not assignable to
/// type 'B'" followed by the property that failed to match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageChain {
    /// The text of this link.
    pub text: String,
    /// Elaborations of this link, one level deeper.
    pub next: Vec<MessageChain>,
}

impl MessageChain {
    /// Creates a chain link with no elaborations.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next: Vec::new(),
        }
    }

    /// Appends an elaboration.
    pub fn with_next(mut self, next: MessageChain) -> Self {
        self.next.push(next);
        self
    }

    fn flatten_into(&self, out: &mut String, separator: &str, depth: usize) {
        if depth > 0 {
            out.push_str(separator);
            for _ in 0..depth {
                out.push_str("  ");
            }
        }
        out.push_str(&self.text);
        for next in &self.next {
            next.flatten_into(out, separator, depth + 1);
        }
    }
}

/// The message of a diagnostic: plain text or a chain of nested messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticMessage {
    /// A single line of text.
    Text(String),
    /// A nested chain of messages.
    Chain(MessageChain),
}

impl DiagnosticMessage {
    /// Flattens the message into one string.
    ///
    /// Every nested link starts on a new line (joined with `separator`) and is
    /// indented by two spaces per level of nesting.
    pub fn flatten(&self, separator: &str) -> String {
        match self {
            DiagnosticMessage::Text(text) => text.clone(),
            DiagnosticMessage::Chain(chain) => {
                let mut out = String::new();
                chain.flatten_into(&mut out, separator, 0);
                out
            }
        }
    }
}

impl From<&str> for DiagnosticMessage {
    fn from(text: &str) -> Self {
        DiagnosticMessage::Text(text.to_string())
    }
}

impl From<String> for DiagnosticMessage {
    fn from(text: String) -> Self {
        DiagnosticMessage::Text(text)
    }
}

impl From<MessageChain> for DiagnosticMessage {
    fn from(chain: MessageChain) -> Self {
        DiagnosticMessage::Chain(chain)
    }
}
