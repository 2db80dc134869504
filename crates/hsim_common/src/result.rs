//! The error raised when the simulator's own bookkeeping is inconsistent.

/// A simulator bug, as opposed to a failed check or a misbehaving model.
///
/// Carries only a message; nothing can be recovered from one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal simulator error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Wraps `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
