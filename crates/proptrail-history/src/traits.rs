use proptrail_types::{NodePath, Revnum};

use crate::error::HistoryResult;
use crate::types::{Ancestor, DirEntry};

/// Read boundary a property provider needs from a versioned backend.
///
/// Three questions, nothing more: did a revision touch a path, what does
/// the node look like there, and where did it come from. Backends that can
/// answer these can serve incremental property queries.
pub trait HistoryLog: Send + Sync {
    /// Whether `revnum` recorded a change for exactly `path`.
    ///
    /// Revision zero touches only the root. Asking about a revision the
    /// log does not have is an error, not `false`.
    fn touches_path(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<bool>;

    /// Raw node read: the directory entry for `path` at `revnum`.
    fn get_dir(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<DirEntry>;

    /// The predecessor of `path` as it stood at `revnum`, following
    /// copies and renames.
    ///
    /// `None` means the node has no predecessor: either `revnum` is zero,
    /// or the node was freshly added there without copy history.
    fn get_previous(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<Option<Ancestor>>;
}
