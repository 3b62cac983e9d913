//! Shared foundational types used across the kiln compile cache.
//!
//! This crate provides content hashing for change detection and the internal
//! error type used when a collaborator fails in a way no diagnostic can describe.

#![warn(missing_docs)]

pub mod hash;
pub mod result;

pub use hash::ContentHash;
pub use result::{InternalError, KilnResult};
