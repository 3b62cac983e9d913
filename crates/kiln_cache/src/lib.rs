//! Generational cache of parsed source files.
//!
//! The [`FileCache`] keeps exactly two generations of [`FileRecord`]s: the
//! current build and the one before it. A file whose text is byte-identical
//! to a record in either generation reuses that record's parsed handle, so
//! unchanged files are never parsed twice across rebuilds.

#![warn(missing_docs)]

pub mod cache;
pub mod changes;
pub mod error;
pub mod record;

pub use cache::{CacheStats, FileCache};
pub use changes::ChangeSet;
pub use error::CacheError;
pub use record::{Admitted, FileObserved, FileRecord, Reuse};
