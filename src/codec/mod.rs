//! Codec module
//!
//! Converts between the flat form ([`FlatGroup`](crate::form::FlatGroup)) and
//! the canonical tree ([`QueryTree`](crate::query::QueryTree)):
//! - leaf level: [`encode_condition`] / [`decode_condition`]
//! - group level: [`fold_group`] / [`unfold_group`]
//! - root level: [`fold_query`] / [`unfold_query`]
//!
//! Folding needs a complete form and fails with
//! [`QueryBuilderError::Incomplete`](crate::error::QueryBuilderError::Incomplete)
//! otherwise. Unfolding never fails; stale or malformed stored data degrades to
//! an editable form.

mod condition;
mod group;
mod tree;

#[cfg(test)]
mod property_tests;

pub use condition::{decode_condition, encode_condition};
pub use group::{fold_group, unfold_group};
pub use tree::{fold_query, unfold_query};
