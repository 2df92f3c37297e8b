//! Incremental property queries over a history log.
//!
//! Importers that mirror foreign version control history keep bookkeeping
//! in versioned properties on branch paths: append-only records such as
//! merge lists and revision-id logs. Reading the whole value at every
//! revision and re-deriving "what is new here" is wasteful; this crate
//! asks the narrower question directly.
//!
//! [`PropertyProvider`] exposes three escalating reads over any
//! [`HistoryLog`](proptrail_history::HistoryLog):
//! - `get_properties`: the full snapshot at one revision
//! - `get_changed_properties`: the names one revision changed
//! - `get_property_diff`: the bytes one revision appended to one value
//!
//! A value that shrank or was rewritten is never an error; the diff is
//! simply empty, and [`AppendOutcome`] keeps the distinction for callers
//! that care.

pub mod append;
pub mod error;
pub mod provider;

pub use append::{append_diff, AppendOutcome};
pub use error::{ProviderError, ProviderResult};
pub use provider::PropertyProvider;
