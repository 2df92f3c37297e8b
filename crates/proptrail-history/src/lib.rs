//! History log boundary for proptrail.
//!
//! This crate defines the narrow capability surface the property provider
//! needs from a versioned backend, plus two implementations of it:
//! - [`HistoryLog`] trait: touch queries, directory reads, copy-aware
//!   ancestry
//! - [`InMemoryHistory`]: a committable versioned tree for tests and
//!   embedding
//! - [`CachedHistory`]: a memoizing decorator over any other log
//!
//! The trait deliberately stays small. Anything a backend can answer is
//! reduced to three questions: did revision N touch path P, what does
//! directory P look like at N, and where did (P, N) come from.

pub mod cache;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use cache::CachedHistory;
pub use error::{HistoryError, HistoryResult};
pub use memory::InMemoryHistory;
pub use traits::HistoryLog;
pub use types::{Ancestor, ChangeKind, DirEntry, PathChange};
