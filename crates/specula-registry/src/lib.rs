//! Registry layer of the specula reflection toolkit.
//!
//! This crate provides:
//!
//! - [`TypeRegistry`] - registration, candidate-name resolution with a
//!   winning-name memo, the lazy per-type member-index cache, the
//!   exact-signature constructor cache, and the ancestor-walking field
//!   lookup
//! - [`MemberIndex`] / [`MemberTable`] - immutable per-type member
//!   snapshots grouped by value type
//! - [`BoundInstance`] - a live type-erased value paired with its entry and
//!   index
//!
//! The filter engine and accessors that consume these live in the `specula`
//! facade crate.

mod bound;
mod member_index;
mod registry;

pub use bound::BoundInstance;
pub use member_index::{MemberIndex, MemberTable};
pub use registry::TypeRegistry;
