//! Foundation types for proptrail.
//!
//! Every other proptrail crate depends on this one. It provides the
//! revision, path, and property types the engine speaks in.
//!
//! # Key Types
//!
//! - [`Revnum`] — Revision number in the repository's numbering scheme
//! - [`NodePath`] — Normalized repository-relative node path
//! - [`PropertyValue`] — Opaque byte value of one property
//! - [`PropertySet`] — All properties set directly on a node at one revision

pub mod error;
pub mod path;
pub mod properties;
pub mod revision;

pub use error::TypeError;
pub use path::NodePath;
pub use properties::{PropertySet, PropertyValue};
pub use revision::Revnum;
