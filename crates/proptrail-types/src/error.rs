use thiserror::Error;

/// Errors produced by foundation-type construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The string cannot be normalized into a node path.
    #[error("invalid node path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The string cannot be parsed into a revision number.
    #[error("invalid revision number: {0:?}")]
    InvalidRevnum(String),
}
