//! Error types for property queries.

use proptrail_history::HistoryError;
use proptrail_types::{Revnum, TypeError};

/// Errors produced by property queries.
///
/// Collaborator failures are translated uniformly at this boundary: a
/// missing revision becomes [`ProviderError::NoSuchRevision`] no matter
/// which underlying call tripped over it, and every other backend failure
/// passes through opaquely as [`ProviderError::Backend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The requested revision does not exist in the history log.
    #[error("no such revision: {0}")]
    NoSuchRevision(Revnum),

    /// The path argument failed normalization.
    #[error(transparent)]
    InvalidPath(#[from] TypeError),

    /// The history backend failed for a reason queries cannot interpret.
    #[error("history backend error: {0}")]
    Backend(HistoryError),
}

/// Convenience alias for provider results.
pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<HistoryError> for ProviderError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoSuchRevision(revnum) => ProviderError::NoSuchRevision(revnum),
            other => ProviderError::Backend(other),
        }
    }
}
