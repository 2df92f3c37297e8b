use std::collections::HashMap;
use std::sync::RwLock;

use proptrail_types::{NodePath, Revnum};

use crate::error::{HistoryError, HistoryResult};
use crate::traits::HistoryLog;
use crate::types::{Ancestor, DirEntry};

const DEFAULT_CAPACITY: usize = 8192;

/// Memoizing decorator over any [`HistoryLog`].
///
/// Only successful [`HistoryLog::get_dir`] reads are cached: committed
/// revisions are immutable, so a `(path, revnum)` read never changes once
/// it has succeeded. Errors are never cached, because a revision that is
/// missing now may exist after the head advances. Touch and ancestry
/// queries pass straight through.
pub struct CachedHistory<L> {
    inner: L,
    capacity: usize,
    dirs: RwLock<HashMap<(NodePath, Revnum), DirEntry>>,
}

impl<L> CachedHistory<L> {
    pub fn new(inner: L) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// A capacity of zero disables caching entirely. When the cache fills
    /// it is dropped wholesale rather than evicted entry by entry.
    pub fn with_capacity(inner: L, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            dirs: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: HistoryLog> HistoryLog for CachedHistory<L> {
    fn touches_path(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<bool> {
        self.inner.touches_path(path, revnum)
    }

    fn get_dir(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<DirEntry> {
        {
            let dirs = self
                .dirs
                .read()
                .map_err(|_| HistoryError::backend("dir cache read lock poisoned"))?;
            if let Some(entry) = dirs.get(&(path.clone(), revnum)) {
                return Ok(entry.clone());
            }
        }

        let entry = self.inner.get_dir(path, revnum)?;

        if self.capacity > 0 {
            let mut dirs = self
                .dirs
                .write()
                .map_err(|_| HistoryError::backend("dir cache write lock poisoned"))?;
            if dirs.len() >= self.capacity {
                dirs.clear();
            }
            dirs.insert((path.clone(), revnum), entry.clone());
        }

        Ok(entry)
    }

    fn get_previous(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<Option<Ancestor>> {
        self.inner.get_previous(path, revnum)
    }
}
