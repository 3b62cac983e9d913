//! Source file classification by extension.

use std::path::Path;

/// The kind of a source file, derived from its name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FileKind {
    /// A declaration-only file (`.d.ts`), which never produces output.
    Declaration,
    /// A TypeScript file (`.ts`).
    TypeScript,
    /// A TypeScript file with JSX (`.tsx`).
    Tsx,
    /// A JavaScript file (`.js` or `.jsx`).
    JavaScript,
    /// Anything else; passed through untouched.
    Other,
}

impl FileKind {
    /// Classifies a path by its (case-insensitive) file name.
    pub fn classify(path: &Path) -> Self {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return FileKind::Other;
        };
        let name = name.to_ascii_lowercase();

        if name.ends_with(".d.ts") {
            FileKind::Declaration
        } else if name.ends_with(".tsx") {
            FileKind::Tsx
        } else if name.ends_with(".ts") {
            FileKind::TypeScript
        } else if name.ends_with(".js") || name.ends_with(".jsx") {
            FileKind::JavaScript
        } else {
            FileKind::Other
        }
    }

    /// Returns `true` for `.ts`, `.tsx` and `.d.ts` files.
    pub fn is_typescript(self) -> bool {
        matches!(self, FileKind::Declaration | FileKind::TypeScript | FileKind::Tsx)
    }

    /// The extension of the compiled output for this kind of input.
    ///
    /// `.tsx` input keeps its JSX (and therefore a `.jsx` extension) only when
    /// JSX is preserved; everything else compiles to `.js`.
    pub fn output_extension(self, preserve_jsx: bool) -> &'static str {
        match self {
            FileKind::Tsx if preserve_jsx => "jsx",
            _ => "js",
        }
    }
}
