//! Common result and error types for kiln.

/// The result type for operations that can only fail through a bug or a
/// misbehaving collaborator.
///
/// `Err` is never used for user-facing findings such as type errors; those are
/// translated into diagnostics and delivered as events while the operation
/// itself still returns `Ok`.
pub type KilnResult<T> = Result<T, InternalError>;

/// An internal failure that no diagnostic can describe.
///
/// Raised, for example, when the external compile service cannot produce a
/// program object at all.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
