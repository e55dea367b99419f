//! Flat form module
//!
//! The editor-facing representation of a query, the edit operations that
//! mutate it, and the validation run before it is folded into a tree.

mod cascade;
mod edit;
mod model;
pub mod validate;


pub use model::*;
pub use validate::{
    check_value, validate, validate_condition, FieldLocation, FormField, ValidationError,
    ValidationErrors, MAX_AGE, MIN_AGE,
};
