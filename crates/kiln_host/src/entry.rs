//! Gathering entry files from the rows a build driver hands over.

use std::path::{Path, PathBuf};

use kiln_source::canonicalize;
use serde::Deserialize;

/// One input row from the build driver.
///
/// Drivers describe entries loosely: a row names its file through `file` or,
/// failing that, `id`, and may carry inline `source` text or a `basedir` the
/// name is relative to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryRow {
    /// Path of the entry file.
    #[serde(default)]
    pub file: Option<String>,
    /// Fallback identifier, used as a path when `file` is absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Inline source text. Rows carrying it are not files on disk.
    #[serde(default)]
    pub source: Option<String>,
    /// Directory `file` is relative to.
    #[serde(default)]
    pub basedir: Option<PathBuf>,
}

impl EntryRow {
    /// A row naming `file` and nothing else.
    pub fn file(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    fn name(&self) -> Option<&str> {
        self.file.as_deref().or(self.id.as_deref())
    }
}

/// The outcome of [`gather_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatheredEntries {
    /// Absolute paths of the entry files, in row order.
    pub entries: Vec<PathBuf>,
    /// Names of rows that were skipped.
    pub ignored: Vec<String>,
}

/// Picks the entry files out of `rows`.
///
/// Rows with inline source are ignored. A row with a `basedir` resolves its
/// name against it; otherwise only absolute names are accepted.
pub fn gather_entries(rows: &[EntryRow]) -> GatheredEntries {
    let mut gathered = GatheredEntries::default();

    for row in rows {
        let Some(name) = row.name() else {
            continue;
        };
        if row.source.is_some() {
            gathered.ignored.push(name.to_string());
            continue;
        }

        let path = Path::new(name);
        match &row.basedir {
            Some(basedir) => gathered
                .entries
                .push(canonicalize(path, basedir).into_path_buf()),
            None if path.is_absolute() => gathered.entries.push(path.to_path_buf()),
            None => gathered.ignored.push(name.to_string()),
        }
    }

    gathered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_files_are_taken_as_is() {
        let gathered = gather_entries(&[EntryRow::file("/app/src/main.ts")]);
        assert_eq!(gathered.entries, vec![PathBuf::from("/app/src/main.ts")]);
        assert!(gathered.ignored.is_empty());
    }

    #[test]
    fn basedir_resolves_relative_names() {
        let row = EntryRow {
            basedir: Some(PathBuf::from("/app")),
            ..EntryRow::file("./src/../lib/util.ts")
        };
        let gathered = gather_entries(&[row]);
        assert_eq!(gathered.entries, vec![PathBuf::from("/app/lib/util.ts")]);
    }

    #[test]
    fn id_is_the_fallback_name() {
        let row = EntryRow {
            id: Some("/app/index.ts".to_string()),
            ..EntryRow::default()
        };
        assert_eq!(
            gather_entries(&[row]).entries,
            vec![PathBuf::from("/app/index.ts")]
        );
    }

    #[test]
    fn inline_source_and_bare_relative_names_are_ignored() {
        let inline = EntryRow {
            source: Some("export {}".to_string()),
            ..EntryRow::file("/app/virtual.ts")
        };
        let relative = EntryRow::file("src/main.ts");
        let gathered = gather_entries(&[inline, relative, EntryRow::default()]);

        assert!(gathered.entries.is_empty());
        assert_eq!(gathered.ignored, vec!["/app/virtual.ts", "src/main.ts"]);
    }

    #[test]
    fn rows_deserialize_from_json() {
        let rows: Vec<EntryRow> =
            serde_json::from_str(r#"[{"file": "a.ts", "basedir": "/app"}, {"id": "/b.ts"}]"#).unwrap();
        let gathered = gather_entries(&rows);
        assert_eq!(
            gathered.entries,
            vec![PathBuf::from("/app/a.ts"), PathBuf::from("/b.ts")]
        );
    }
}
