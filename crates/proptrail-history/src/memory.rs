use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use proptrail_types::{NodePath, PropertySet, Revnum};

use crate::error::{HistoryError, HistoryResult};
use crate::traits::HistoryLog;
use crate::types::{Ancestor, ChangeKind, DirEntry, PathChange};

/// In-memory history log for tests, local tooling, and embedding.
///
/// Revisions are immutable once committed and numbered from 1; revision 0
/// is the implicit empty root. Property inheritance is resolved at commit
/// time, so every stored change carries the node's complete property set
/// and reads never chase modify chains.
pub struct InMemoryHistory {
    inner: RwLock<HistoryState>,
}

#[derive(Default)]
struct HistoryState {
    /// `revisions[i]` holds the changes of revision `i + 1`.
    revisions: Vec<RevisionRecord>,
}

struct RevisionRecord {
    changes: BTreeMap<NodePath, StoredChange>,
}

#[derive(Clone)]
struct StoredChange {
    kind: ChangeKind,
    copy_from: Option<(NodePath, Revnum)>,
    /// Complete property set after the change; `None` only for deletes.
    props: Option<PropertySet>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HistoryState::default()),
        }
    }

    /// The newest committed revision; zero for an empty log.
    pub fn head(&self) -> HistoryResult<Revnum> {
        let state = read_lock(&self.inner)?;
        Ok(Revnum::new(state.revisions.len() as u64))
    }

    pub fn is_empty(&self) -> HistoryResult<bool> {
        Ok(self.head()?.is_zero())
    }

    /// Commit one revision. Changes are validated against the current head
    /// as a batch, in path order, so a parent added in the same revision
    /// satisfies its children.
    pub fn commit(&self, changes: Vec<PathChange>) -> HistoryResult<Revnum> {
        let mut state = write_lock(&self.inner)?;
        let head = Revnum::new(state.revisions.len() as u64);

        let mut ordered: BTreeMap<NodePath, PathChange> = BTreeMap::new();
        for change in changes {
            let path = change.path.clone();
            if ordered.insert(path.clone(), change).is_some() {
                return Err(rejected(&path, "duplicate change for path"));
            }
        }

        let mut resolved: BTreeMap<NodePath, StoredChange> = BTreeMap::new();
        for (path, change) in &ordered {
            let stored = resolve_change(&state, head, &resolved, path, change)?;
            resolved.insert(path.clone(), stored);
        }

        let changed = resolved.len();
        state.revisions.push(RevisionRecord { changes: resolved });
        let revnum = head.next();
        debug!(revnum = revnum.get(), changed, "committed revision");
        Ok(revnum)
    }

    /// The paths changed by `revnum`, in path order. Revision zero changes
    /// nothing.
    pub fn changed_paths(&self, revnum: Revnum) -> HistoryResult<Vec<NodePath>> {
        let state = read_lock(&self.inner)?;
        check_revnum(&state, revnum)?;
        let Some(prev) = revnum.previous() else {
            return Ok(vec![]);
        };
        let record = &state.revisions[prev.get() as usize];
        Ok(record.changes.keys().cloned().collect())
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog for InMemoryHistory {
    fn touches_path(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<bool> {
        let state = read_lock(&self.inner)?;
        check_revnum(&state, revnum)?;
        let Some(prev) = revnum.previous() else {
            // Revision zero creates the root and nothing else.
            return Ok(path.is_root());
        };
        let record = &state.revisions[prev.get() as usize];
        Ok(record.changes.contains_key(path.as_str()))
    }

    fn get_dir(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<DirEntry> {
        let state = read_lock(&self.inner)?;
        let props = resolve_node(&state, path, revnum)?.ok_or_else(|| {
            HistoryError::PathNotFound {
                path: path.to_string(),
                revnum,
            }
        })?;
        Ok(DirEntry::new(path.file_name(), None, props))
    }

    fn get_previous(&self, path: &NodePath, revnum: Revnum) -> HistoryResult<Option<Ancestor>> {
        let state = read_lock(&self.inner)?;
        check_revnum(&state, revnum)?;
        let Some(prev) = revnum.previous() else {
            return Ok(None);
        };
        let record = &state.revisions[prev.get() as usize];
        let Some(change) = record.changes.get(path.as_str()) else {
            // Untouched by this revision: same path, one revision back.
            return Ok(Some(Ancestor::new(path.clone(), prev)));
        };
        if let Some((source, source_rev)) = &change.copy_from {
            return Ok(Some(Ancestor::new(source.clone(), *source_rev)));
        }
        match change.kind {
            // A fresh add has no predecessor.
            ChangeKind::Added => Ok(None),
            _ => Ok(Some(Ancestor::new(path.clone(), prev))),
        }
    }
}

fn read_lock(
    lock: &RwLock<HistoryState>,
) -> HistoryResult<std::sync::RwLockReadGuard<'_, HistoryState>> {
    lock.read()
        .map_err(|_| HistoryError::backend("history read lock poisoned"))
}

fn write_lock(
    lock: &RwLock<HistoryState>,
) -> HistoryResult<std::sync::RwLockWriteGuard<'_, HistoryState>> {
    lock.write()
        .map_err(|_| HistoryError::backend("history write lock poisoned"))
}

fn check_revnum(state: &HistoryState, revnum: Revnum) -> HistoryResult<()> {
    if revnum.get() > state.revisions.len() as u64 {
        return Err(HistoryError::NoSuchRevision(revnum));
    }
    Ok(())
}

fn rejected(path: &NodePath, reason: &str) -> HistoryError {
    HistoryError::InvalidChange {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// The property set of `path` at `revnum`, or `None` when the node does
/// not exist there. Walks newest-to-oldest; the deepest record within a
/// revision governs, and copies recurse into the source at its revision.
fn resolve_node(
    state: &HistoryState,
    path: &NodePath,
    revnum: Revnum,
) -> HistoryResult<Option<PropertySet>> {
    check_revnum(state, revnum)?;
    let mut r = revnum.get();
    while r >= 1 {
        let record = &state.revisions[(r - 1) as usize];
        if let Some(change) = record.changes.get(path.as_str()) {
            return Ok(match change.kind {
                ChangeKind::Deleted => None,
                _ => change.props.clone(),
            });
        }
        match resolve_under_ancestors(state, &record.changes, path)? {
            Governed::Present(props) => return Ok(Some(props)),
            Governed::Absent => return Ok(None),
            Governed::Untouched => {}
        }
        r -= 1;
    }
    // Nothing in history mentions the node: only the root exists.
    Ok(path.is_root().then(PropertySet::new))
}

enum Governed {
    /// An ancestor change proves the node exists, with these properties.
    Present(PropertySet),
    /// An ancestor change proves the node does not exist.
    Absent,
    /// No ancestor change in this record decides either way.
    Untouched,
}

/// Whether a change to some ancestor of `path` decides the node's fate:
/// a deleted ancestor removes the subtree, a copied ancestor maps the
/// node to the copy source, a fresh add or replace cuts it off.
fn resolve_under_ancestors(
    state: &HistoryState,
    changes: &BTreeMap<NodePath, StoredChange>,
    path: &NodePath,
) -> HistoryResult<Governed> {
    for ancestor in path.ancestors() {
        let Some((base, change)) = changes.get_key_value(ancestor) else {
            continue;
        };
        match change.kind {
            // A property-only change on a directory says nothing about
            // what lives beneath it.
            ChangeKind::Modified => continue,
            ChangeKind::Deleted => return Ok(Governed::Absent),
            ChangeKind::Added | ChangeKind::Replaced => {
                let Some((source, source_rev)) = &change.copy_from else {
                    return Ok(Governed::Absent);
                };
                let Some(rebased) = path.rebase(base, source) else {
                    return Ok(Governed::Absent);
                };
                return Ok(match resolve_node(state, &rebased, *source_rev)? {
                    Some(props) => Governed::Present(props),
                    None => Governed::Absent,
                });
            }
        }
    }
    Ok(Governed::Untouched)
}

/// Pending-aware resolution used during commit validation: changes already
/// accepted into the same revision shadow the committed state.
fn current_props(
    state: &HistoryState,
    pending: &BTreeMap<NodePath, StoredChange>,
    path: &NodePath,
    head: Revnum,
) -> HistoryResult<Option<PropertySet>> {
    if let Some(change) = pending.get(path.as_str()) {
        return Ok(match change.kind {
            ChangeKind::Deleted => None,
            _ => change.props.clone(),
        });
    }
    match resolve_under_ancestors(state, pending, path)? {
        Governed::Present(props) => return Ok(Some(props)),
        Governed::Absent => return Ok(None),
        Governed::Untouched => {}
    }
    resolve_node(state, path, head)
}

fn resolve_change(
    state: &HistoryState,
    head: Revnum,
    pending: &BTreeMap<NodePath, StoredChange>,
    path: &NodePath,
    change: &PathChange,
) -> HistoryResult<StoredChange> {
    if change.copy_from.is_some()
        && !matches!(change.kind, ChangeKind::Added | ChangeKind::Replaced)
    {
        return Err(rejected(path, "copy source only applies to adds and replaces"));
    }
    if change.kind == ChangeKind::Deleted && change.props.is_some() {
        return Err(rejected(path, "deleted path cannot carry properties"));
    }
    if path.is_root() && matches!(change.kind, ChangeKind::Deleted | ChangeKind::Replaced) {
        return Err(rejected(path, "the root cannot be deleted or replaced"));
    }
    if let Some(props) = &change.props {
        if props.names().any(str::is_empty) {
            return Err(rejected(path, "property names must be non-empty"));
        }
    }

    let existing = current_props(state, pending, path, head)?;
    match change.kind {
        ChangeKind::Added => {
            if existing.is_some() {
                return Err(rejected(path, "path already exists"));
            }
            let parent_alive = match path.parent() {
                Some(parent) => current_props(state, pending, &parent, head)?.is_some(),
                None => true,
            };
            if !parent_alive {
                return Err(rejected(path, "parent directory does not exist"));
            }
        }
        ChangeKind::Modified | ChangeKind::Deleted | ChangeKind::Replaced => {
            if existing.is_none() {
                return Err(rejected(path, "path does not exist"));
            }
        }
    }

    let copied = match &change.copy_from {
        Some((source, source_rev)) => match resolve_node(state, source, *source_rev) {
            Ok(Some(props)) => Some(props),
            Ok(None) | Err(HistoryError::NoSuchRevision(_)) => {
                return Err(rejected(
                    path,
                    &format!("copy source {source}@{source_rev} does not exist"),
                ));
            }
            Err(other) => return Err(other),
        },
        None => None,
    };

    let props = if change.kind == ChangeKind::Deleted {
        None
    } else if let Some(props) = &change.props {
        Some(props.clone())
    } else if let Some(props) = copied {
        Some(props)
    } else if change.kind == ChangeKind::Modified {
        // Validated above: the node exists, so `existing` is set.
        existing
    } else {
        // Fresh adds and replaces start with no properties.
        Some(PropertySet::new())
    };

    Ok(StoredChange {
        kind: change.kind,
        copy_from: change.copy_from.clone(),
        props,
    })
}
