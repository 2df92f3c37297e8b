//! Byte-wise append detection between two property values.

use proptrail_types::PropertyValue;

/// How a property value at one revision relates to its previous value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The value is byte-identical to the previous one.
    Unchanged,
    /// The previous value is a proper prefix of the current one; the
    /// fragment holds the appended bytes.
    Appended(PropertyValue),
    /// The value changed in some non-append way. `diverged_at` is the
    /// first byte index where the two values disagree; for a shrink it is
    /// the current value's length.
    Rewritten { diverged_at: usize },
}

impl AppendOutcome {
    /// The appended bytes, with anything that is not a clean append
    /// flattened to the empty value.
    pub fn into_fragment(self) -> PropertyValue {
        match self {
            AppendOutcome::Appended(fragment) => fragment,
            AppendOutcome::Unchanged | AppendOutcome::Rewritten { .. } => PropertyValue::empty(),
        }
    }
}

/// Classify the change from `previous` to `current`.
///
/// The comparison is byte-wise; no line or encoding structure is assumed.
/// A value that shrank or was rewritten is reported as [`Rewritten`], not
/// an error: callers that only want the appended bytes treat it as "nothing
/// new".
///
/// [`Rewritten`]: AppendOutcome::Rewritten
pub fn append_diff(previous: &PropertyValue, current: &PropertyValue) -> AppendOutcome {
    let prev = previous.as_bytes();
    let cur = current.as_bytes();
    if prev == cur {
        return AppendOutcome::Unchanged;
    }
    if cur.starts_with(prev) {
        return AppendOutcome::Appended(PropertyValue::from(&cur[prev.len()..]));
    }
    let diverged_at = prev
        .iter()
        .zip(cur.iter())
        .position(|(a, b)| a != b)
        .unwrap_or(prev.len().min(cur.len()));
    AppendOutcome::Rewritten { diverged_at }
}
