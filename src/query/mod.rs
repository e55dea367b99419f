//! Canonical query tree module
//!
//! Types for the recursive, storage-facing representation of a query and its
//! JSON wire format.

mod model;
mod value;
mod wire;

pub use model::*;
pub use value::*;

pub(crate) use wire::deserialize_age_bound;
