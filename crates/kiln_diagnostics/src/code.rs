//! Numeric diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The numeric identifier the compiler assigns to a kind of diagnostic.
///
/// Displayed with a `TS` prefix, e.g. `TS2322`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticCode(pub u32);

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the raw number.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::new(2322)), "TS2322");
        assert_eq!(format!("{}", DiagnosticCode::new(1005)), "TS1005");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(6053);
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "6053");
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
