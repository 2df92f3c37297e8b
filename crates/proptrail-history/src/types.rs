//! Record types exchanged across the history log boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use proptrail_types::{NodePath, PropertySet, Revnum};

/// How a revision changed one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    /// Deleted and re-added under the same name in one revision.
    Replaced,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Replaced => "replaced",
        };
        f.write_str(label)
    }
}

/// One path's change within a committed revision.
///
/// `props`, when present, is the complete property set of the node after
/// the change. When absent the node inherits: an add starts empty, a copy
/// carries the source's properties, a modify keeps the previous set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathChange {
    pub path: NodePath,
    pub kind: ChangeKind,
    /// Copy source for adds and replaces that copy history.
    pub copy_from: Option<(NodePath, Revnum)>,
    pub props: Option<PropertySet>,
}

impl PathChange {
    fn new(path: NodePath, kind: ChangeKind) -> Self {
        PathChange {
            path,
            kind,
            copy_from: None,
            props: None,
        }
    }

    pub fn add(path: NodePath) -> Self {
        PathChange::new(path, ChangeKind::Added)
    }

    pub fn modify(path: NodePath) -> Self {
        PathChange::new(path, ChangeKind::Modified)
    }

    pub fn delete(path: NodePath) -> Self {
        PathChange::new(path, ChangeKind::Deleted)
    }

    pub fn replace(path: NodePath) -> Self {
        PathChange::new(path, ChangeKind::Replaced)
    }

    /// Record the copy source, turning an add or replace into a copy.
    pub fn from_copy(mut self, source: NodePath, revnum: Revnum) -> Self {
        self.copy_from = Some((source, revnum));
        self
    }

    /// Set the node's complete property set after this change.
    pub fn with_props(mut self, props: PropertySet) -> Self {
        self.props = Some(props);
        self
    }

    pub fn is_copy(&self) -> bool {
        self.copy_from.is_some()
    }
}

/// A prior incarnation of a path: where (path, revision) came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ancestor {
    pub path: NodePath,
    pub revnum: Revnum,
}

impl Ancestor {
    pub fn new(path: NodePath, revnum: Revnum) -> Self {
        Ancestor { path, revnum }
    }
}

impl fmt::Display for Ancestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.revnum)
    }
}

/// A raw node read: what the backend knows about one directory entry.
///
/// Property readers consume only `props`; `name` and `size` ride along
/// because backends report them in the same fetch. `size` is `None` when
/// the backend does not track sizes for the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub size: Option<u64>,
    pub props: PropertySet,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, size: Option<u64>, props: PropertySet) -> Self {
        DirEntry {
            name: name.into(),
            size,
            props,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> NodePath {
        NodePath::new(s).unwrap()
    }

    #[test]
    fn builders_chain_into_full_records() {
        let change = PathChange::add(path("branches/stable"))
            .from_copy(path("trunk"), Revnum::new(14))
            .with_props(PropertySet::new().with("svn:ignore", "*.o\n"));

        assert_eq!(change.kind, ChangeKind::Added);
        assert!(change.is_copy());
        assert_eq!(
            change.copy_from,
            Some((path("trunk"), Revnum::new(14)))
        );
        assert_eq!(
            change.props.unwrap().value_or_empty("svn:ignore"),
            "*.o\n"
        );
    }

    #[test]
    fn plain_changes_have_no_copy_or_props() {
        let change = PathChange::modify(path("trunk"));
        assert!(!change.is_copy());
        assert_eq!(change.props, None);
    }

    #[test]
    fn ancestor_displays_as_path_at_revision() {
        let a = Ancestor::new(path("trunk"), Revnum::new(7));
        assert_eq!(a.to_string(), "trunk@7");
    }

    #[test]
    fn change_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::Replaced).unwrap(),
            "\"replaced\""
        );
        assert_eq!(ChangeKind::Added.to_string(), "added");
    }

    #[test]
    fn path_change_roundtrips_through_json() {
        let change = PathChange::replace(path("tags/1.0"))
            .from_copy(path("trunk"), Revnum::new(3));
        let json = serde_json::to_string(&change).unwrap();
        let back: PathChange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
    }
}
