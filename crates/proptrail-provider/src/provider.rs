use tracing::debug;

use proptrail_history::{Ancestor, HistoryLog};
use proptrail_types::{NodePath, PropertySet, PropertyValue, Revnum};

use crate::append::{append_diff, AppendOutcome};
use crate::error::ProviderResult;

/// Incremental property queries over a [`HistoryLog`].
///
/// The provider is stateless: every operation reads through to the log, so
/// repeated queries always agree and callers that want memoization layer a
/// `CachedHistory` underneath instead.
///
/// Operations escalate in selectivity:
/// - [`get_properties`]: the full snapshot of one node at one revision
/// - [`get_changed_properties`]: only the names a revision changed, with
///   their new values
/// - [`get_property_diff`]: only the bytes a revision appended to one
///   value
///
/// Path arguments are accepted in raw string form and normalized on entry,
/// so `"/trunk"` and `"trunk"` name the same node.
///
/// [`get_properties`]: PropertyProvider::get_properties
/// [`get_changed_properties`]: PropertyProvider::get_changed_properties
/// [`get_property_diff`]: PropertyProvider::get_property_diff
pub struct PropertyProvider<L> {
    history: L,
}

impl<L: HistoryLog> PropertyProvider<L> {
    pub fn new(history: L) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &L {
        &self.history
    }

    pub fn into_inner(self) -> L {
        self.history
    }

    /// The complete property set of `path` at `revnum`.
    pub fn get_properties(
        &self,
        path: impl AsRef<str>,
        revnum: Revnum,
    ) -> ProviderResult<PropertySet> {
        let path = NodePath::new(path)?;
        self.snapshot(&path, revnum)
    }

    /// One property out of the snapshot, `None` when the name is not set.
    pub fn get_property(
        &self,
        path: impl AsRef<str>,
        revnum: Revnum,
        name: &str,
    ) -> ProviderResult<Option<PropertyValue>> {
        Ok(self.get_properties(path, revnum)?.get(name).cloned())
    }

    /// The properties `revnum` changed on `path`, mapped to their new
    /// values.
    ///
    /// A revision that did not touch the path reports nothing, without
    /// fetching any snapshot. Properties the revision removed are not
    /// reported; the delta only speaks about names present afterwards.
    pub fn get_changed_properties(
        &self,
        path: impl AsRef<str>,
        revnum: Revnum,
    ) -> ProviderResult<PropertySet> {
        let path = NodePath::new(path)?;
        if !self.history.touches_path(&path, revnum)? {
            return Ok(PropertySet::new());
        }

        let current = self.snapshot(&path, revnum)?;
        if current.is_empty() {
            return Ok(current);
        }

        let (_, previous) = self.previous_snapshot(&path, revnum)?;
        let mut changed = PropertySet::new();
        for (name, value) in current.iter() {
            if previous.get(name) != Some(value) {
                changed.insert(name, value.clone());
            }
        }
        Ok(changed)
    }

    /// The bytes `revnum` appended to the named property on `path`.
    ///
    /// Empty when the revision did not touch the path, did not change the
    /// value, or changed it in a way that is not a clean append. An absent
    /// value reads as empty on both sides, so the first value a node is
    /// given comes back whole.
    pub fn get_property_diff(
        &self,
        path: impl AsRef<str>,
        revnum: Revnum,
        name: &str,
    ) -> ProviderResult<PropertyValue> {
        let path = NodePath::new(path)?;
        Ok(self.append_outcome(&path, revnum, name)?.into_fragment())
    }

    /// Like [`get_property_diff`], but keeps the three-way outcome so
    /// callers can tell a rewrite from "nothing appended".
    ///
    /// [`get_property_diff`]: PropertyProvider::get_property_diff
    pub fn property_append(
        &self,
        path: impl AsRef<str>,
        revnum: Revnum,
        name: &str,
    ) -> ProviderResult<AppendOutcome> {
        let path = NodePath::new(path)?;
        self.append_outcome(&path, revnum, name)
    }

    fn append_outcome(
        &self,
        path: &NodePath,
        revnum: Revnum,
        name: &str,
    ) -> ProviderResult<AppendOutcome> {
        if !self.history.touches_path(path, revnum)? {
            return Ok(AppendOutcome::Unchanged);
        }

        let current = self.snapshot(path, revnum)?;
        let (ancestor, previous) = self.previous_snapshot(path, revnum)?;
        let outcome = append_diff(previous.value_or_empty(name), current.value_or_empty(name));
        if let AppendOutcome::Rewritten { diverged_at } = outcome {
            // A rewrite needs a non-empty previous value, so an ancestor
            // was always resolved here.
            if let Some(ancestor) = &ancestor {
                debug!(
                    prev_path = %ancestor.path,
                    prev_revnum = %ancestor.revnum,
                    path = %path,
                    revnum = %revnum,
                    name,
                    diverged_at,
                    "previous property value is not a prefix of the current one"
                );
            }
        }
        Ok(outcome)
    }

    fn snapshot(&self, path: &NodePath, revnum: Revnum) -> ProviderResult<PropertySet> {
        Ok(self.history.get_dir(path, revnum)?.props)
    }

    /// The node's predecessor and its snapshot; the set is empty when no
    /// predecessor exists.
    fn previous_snapshot(
        &self,
        path: &NodePath,
        revnum: Revnum,
    ) -> ProviderResult<(Option<Ancestor>, PropertySet)> {
        match self.history.get_previous(path, revnum)? {
            Some(ancestor) => {
                let props = self.snapshot(&ancestor.path, ancestor.revnum)?;
                Ok((Some(ancestor), props))
            }
            None => Ok((None, PropertySet::new())),
        }
    }
}
