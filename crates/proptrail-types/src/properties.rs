use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A property value: an uninterpreted byte string.
///
/// Values are compared byte-wise everywhere; no encoding is assumed. Text
/// helpers ([`PropertyValue::as_str`]) are conveniences for the common case
/// of UTF-8 content such as newline-separated merge records.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyValue(Vec<u8>);

/// Shared default for absent properties. A `static` (not an inline
/// temporary) so lookups can hand out a reference with the set's lifetime.
static EMPTY_VALUE: PropertyValue = PropertyValue(Vec::new());

impl PropertyValue {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        PropertyValue(bytes.into())
    }

    /// The empty value, equal to what [`PropertySet::value_or_empty`]
    /// returns for an absent name.
    pub fn empty() -> Self {
        PropertyValue(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The value as text, when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(text) => write!(f, "PropertyValue({text:?})"),
            Err(_) => write!(f, "PropertyValue({} bytes)", self.0.len()),
        }
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(bytes: Vec<u8>) -> Self {
        PropertyValue(bytes)
    }
}

impl From<&[u8]> for PropertyValue {
    fn from(bytes: &[u8]) -> Self {
        PropertyValue(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for PropertyValue {
    fn from(bytes: &[u8; N]) -> Self {
        PropertyValue(bytes.to_vec())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        PropertyValue(text.into_bytes())
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue(text.as_bytes().to_vec())
    }
}

impl PartialEq<str> for PropertyValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for PropertyValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// The full property set of one node at one revision, keyed by name.
///
/// Iteration order is the lexicographic name order, which keeps snapshots,
/// deltas, and their serialized forms deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(BTreeMap<String, PropertyValue>);

impl PropertySet {
    pub fn new() -> Self {
        PropertySet(BTreeMap::new())
    }

    /// Insert or replace a property, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder form of [`PropertySet::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// The value under `name`, or the empty value when absent.
    ///
    /// Absent and empty are deliberately indistinguishable here; callers
    /// that must tell them apart use [`PropertySet::get`].
    pub fn value_or_empty(&self, name: &str) -> &PropertyValue {
        self.0.get(name).unwrap_or(&EMPTY_VALUE)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<N, V> FromIterator<(N, V)> for PropertySet
where
    N: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        PropertySet(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for PropertySet {
    type Item = (String, PropertyValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
