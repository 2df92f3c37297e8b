use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A normalized repository-relative node path.
///
/// Construction strips leading and trailing `/` separators, so `"/trunk"`,
/// `"trunk"`, and `"trunk/"` all name the same node. The empty path is the
/// repository root. Interior structure is validated: components must be
/// non-empty (no `a//b`) and must not be `.` or `..`, and backslashes are
/// rejected outright.
///
/// Pair a path with a [`Revnum`](crate::Revnum) to address exactly one
/// property snapshot.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath(String);

impl NodePath {
    /// Normalize and validate a path string.
    pub fn new(path: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = path.as_ref();
        let trimmed = raw.trim_matches('/');
        if trimmed.contains('\\') {
            return Err(invalid(raw, "backslash is not a path separator"));
        }
        if trimmed.is_empty() {
            // All-separator input ("", "/", "//") names the root.
            return Ok(NodePath::root());
        }
        for component in trimmed.split('/') {
            if component.is_empty() {
                return Err(invalid(raw, "empty path component"));
            }
            if component == "." || component == ".." {
                return Err(invalid(raw, "'.' and '..' components are not allowed"));
            }
        }
        Ok(NodePath(trimmed.to_string()))
    }

    /// The repository root (the empty path).
    pub const fn root() -> Self {
        NodePath(String::new())
    }

    /// Returns `true` for the repository root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalized path string (no leading or trailing separator).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path component; empty for the root.
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// The containing directory, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(i) => Some(NodePath(self.0[..i].to_string())),
            None => Some(NodePath::root()),
        }
    }

    /// Append a relative path below this one.
    ///
    /// `rest` is normalized with the same rules as [`NodePath::new`];
    /// joining the root on either side is the identity.
    pub fn join(&self, rest: impl AsRef<str>) -> Result<NodePath, TypeError> {
        let rest = NodePath::new(rest)?;
        if rest.is_root() {
            return Ok(self.clone());
        }
        if self.is_root() {
            return Ok(rest);
        }
        Ok(NodePath(format!("{}/{}", self.0, rest.0)))
    }

    /// The remainder after `base`, when this path is `base` itself or lies
    /// beneath it. The root is a prefix of every path.
    pub fn strip_prefix(&self, base: &NodePath) -> Option<&str> {
        if base.is_root() {
            return Some(&self.0);
        }
        let rest = self.0.strip_prefix(base.as_str())?;
        if rest.is_empty() {
            return Some("");
        }
        rest.strip_prefix('/')
    }

    /// Rewrite this path from one base onto another.
    ///
    /// `a/b/c` rebased from `a` onto `x` is `x/b/c`; rebasing `base`
    /// itself yields `onto`. Returns `None` when `base` is not this path
    /// or one of its ancestors.
    pub fn rebase(&self, base: &NodePath, onto: &NodePath) -> Option<NodePath> {
        let rest = self.strip_prefix(base)?;
        if rest.is_empty() {
            return Some(onto.clone());
        }
        if onto.is_root() {
            return Some(NodePath(rest.to_string()));
        }
        Some(NodePath(format!("{}/{}", onto.0, rest)))
    }

    /// Proper ancestors, deepest first, ending at the root.
    ///
    /// `"a/b/c"` yields `"a/b"`, `"a"`, `""`. The root has no ancestors.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> + '_ {
        let mut next = if self.0.is_empty() {
            None
        } else {
            Some(self.0.as_str())
        };
        std::iter::from_fn(move || {
            let current = next?;
            let ancestor = match current.rfind('/') {
                Some(i) => &current[..i],
                None => "",
            };
            next = if ancestor.is_empty() { None } else { Some(ancestor) };
            Some(ancestor)
        })
    }
}

impl TryFrom<String> for NodePath {
    type Error = TypeError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        NodePath::new(path)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> String {
        path.0
    }
}

impl FromStr for NodePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodePath::new(s)
    }
}

impl Borrow<str> for NodePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid(path: &str, reason: &str) -> TypeError {
    TypeError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> NodePath {
        NodePath::new(s).unwrap()
    }

    #[test]
    fn strips_leading_and_trailing_separators() {
        assert_eq!(path("/trunk").as_str(), "trunk");
        assert_eq!(path("trunk/").as_str(), "trunk");
        assert_eq!(path("//branches/1.0//").as_str(), "branches/1.0");
        assert_eq!(path("trunk"), path("/trunk"));
    }

    #[test]
    fn all_separator_forms_are_the_root() {
        for s in ["", "/", "//"] {
            let p = path(s);
            assert!(p.is_root());
            assert_eq!(p.as_str(), "");
        }
        assert_eq!(NodePath::root(), path(""));
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(NodePath::new("a//b").is_err());
        assert!(NodePath::new(".").is_err());
        assert!(NodePath::new("..").is_err());
        assert!(NodePath::new("a/./b").is_err());
        assert!(NodePath::new("a/../b").is_err());
        assert!(NodePath::new("a\\b").is_err());
    }

    #[test]
    fn rejection_carries_path_and_reason() {
        let err = NodePath::new("a//b").unwrap_err();
        match err {
            TypeError::InvalidPath { path, reason } => {
                assert_eq!(path, "a//b");
                assert!(reason.contains("empty path component"));
            }
            other => panic!("expected InvalidPath, got {other:?}"),
        }
    }

    #[test]
    fn parent_walks_up_to_the_root() {
        let p = path("a/b/c");
        let parent = p.parent().unwrap();
        assert_eq!(parent.as_str(), "a/b");
        let grandparent = parent.parent().unwrap();
        assert_eq!(grandparent.as_str(), "a");
        let root = grandparent.parent().unwrap();
        assert!(root.is_root());
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn file_name_is_the_last_component() {
        assert_eq!(path("a/b/c").file_name(), "c");
        assert_eq!(path("trunk").file_name(), "trunk");
        assert_eq!(NodePath::root().file_name(), "");
    }

    #[test]
    fn join_concatenates_and_normalizes() {
        assert_eq!(path("a").join("b/c").unwrap().as_str(), "a/b/c");
        assert_eq!(path("a").join("/b/").unwrap().as_str(), "a/b");
        assert_eq!(NodePath::root().join("x").unwrap().as_str(), "x");
        assert_eq!(path("a").join("").unwrap().as_str(), "a");
        assert!(path("a").join("b//c").is_err());
    }

    #[test]
    fn strip_prefix_requires_a_component_boundary() {
        let p = path("trunk/doc/README");
        assert_eq!(p.strip_prefix(&path("trunk")), Some("doc/README"));
        assert_eq!(p.strip_prefix(&path("trunk/doc")), Some("README"));
        assert_eq!(p.strip_prefix(&p.clone()), Some(""));
        assert_eq!(p.strip_prefix(&NodePath::root()), Some("trunk/doc/README"));
        // "trunks" is not an ancestor of "trunk/..." and vice versa.
        assert_eq!(path("trunks").strip_prefix(&path("trunk")), None);
        assert_eq!(p.strip_prefix(&path("branches")), None);
    }

    #[test]
    fn rebase_rewrites_the_leading_components() {
        let p = path("trunk/doc/README");
        assert_eq!(
            p.rebase(&path("trunk"), &path("branches/1.0")),
            Some(path("branches/1.0/doc/README"))
        );
        assert_eq!(p.rebase(&p.clone(), &path("tags/x")), Some(path("tags/x")));
        assert_eq!(
            p.rebase(&NodePath::root(), &path("mirror")),
            Some(path("mirror/trunk/doc/README"))
        );
        assert_eq!(
            path("trunk/doc").rebase(&path("trunk"), &NodePath::root()),
            Some(path("doc"))
        );
        assert_eq!(p.rebase(&path("branches"), &path("tags")), None);
    }

    #[test]
    fn ancestors_are_deepest_first_ending_at_root() {
        let deep = path("a/b/c");
        let collected: Vec<&str> = deep.ancestors().collect();
        assert_eq!(collected, vec!["a/b", "a", ""]);

        let shallow = path("a");
        let single: Vec<&str> = shallow.ancestors().collect();
        assert_eq!(single, vec![""]);

        assert_eq!(NodePath::root().ancestors().count(), 0);
    }

    #[test]
    fn serde_normalizes_on_deserialize() {
        let p: NodePath = serde_json::from_str("\"/trunk/\"").unwrap();
        assert_eq!(p.as_str(), "trunk");

        let json = serde_json::to_string(&path("a/b")).unwrap();
        assert_eq!(json, "\"a/b\"");

        let bad: Result<NodePath, _> = serde_json::from_str("\"a//b\"");
        assert!(bad.is_err());
    }
}
