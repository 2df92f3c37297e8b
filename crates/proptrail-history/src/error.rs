//! Error types for history log operations.

use proptrail_types::Revnum;

/// Errors produced by history log implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The requested revision does not exist in the log.
    #[error("no such revision: {0}")]
    NoSuchRevision(Revnum),

    /// The path does not exist at the given revision.
    #[error("path {path:?} not found at revision {revnum}")]
    PathNotFound { path: String, revnum: Revnum },

    /// A change submitted to a writable log was not applicable.
    #[error("invalid change for {path:?}: {reason}")]
    InvalidChange { path: String, reason: String },

    /// The backend failed for a reason the caller cannot interpret.
    #[error("history backend error: {0}")]
    Backend(String),
}

/// Convenience alias for history results.
pub type HistoryResult<T> = Result<T, HistoryError>;

impl HistoryError {
    /// Wrap an opaque backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        HistoryError::Backend(message.into())
    }
}
