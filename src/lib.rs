//! Query Rule Builder - nested AND/OR condition trees for a form-based editor
//!
//! A query exists in two shapes:
//! - the flat form ([`form::FlatGroup`]) edited field by field, with leaves and
//!   nested groups kept in separate lists;
//! - the canonical tree ([`query::QueryTree`]) handed to storage, with one mixed
//!   `condition` list per level and dot-joined leaf titles.
//!
//! [`codec`] converts between them, [`catalogue`] describes the selectable
//! attributes and their value kinds, and [`builder::QueryBuilder`] ties the two
//! into an editing session. Python bindings are available behind the `python`
//! feature.

pub mod builder;
pub mod catalogue;
pub mod codec;
pub mod error;
pub mod form;
pub mod query;

#[cfg(feature = "python")]
mod bindings;

pub use builder::QueryBuilder;
pub use catalogue::{default_catalogue, Catalogue, ValueKind};
pub use codec::{fold_query, unfold_query};
pub use error::{QueryBuilderError, Result};
pub use form::{FlatCondition, FlatGroup, GroupPath, LeafPath};
pub use query::{Action, Combinator, QueryTree};
