//! Leaf condition codec
//!
//! Flat leaf to canonical leaf and back. The title carries the catalogue path
//! that is not part of the payload: `attribute`, `attribute.value` or
//! `attribute.value.sub_value`, and the deepest populated field becomes `item`.

use tracing::warn;

use crate::catalogue::Catalogue;
use crate::error::{QueryBuilderError, Result};
use crate::form::{FieldValue, FlatCondition, ValueDepth};
use crate::query::{LeafCondition, TITLE_SEPARATOR};

fn segment(leaf: &FlatCondition, depth: ValueDepth, name: &'static str) -> Result<String> {
    leaf.field(depth)
        .and_then(FieldValue::as_segment)
        .ok_or(QueryBuilderError::Incomplete(name))
}

/// Flat leaf to canonical leaf
pub fn encode_condition(leaf: &FlatCondition) -> Result<LeafCondition> {
    let attribute = leaf
        .query_attribute
        .as_deref()
        .filter(|a| !a.is_empty())
        .ok_or(QueryBuilderError::Incomplete("query_attribute"))?;
    let action = leaf
        .query_contain
        .ok_or(QueryBuilderError::Incomplete("query_contain"))?;

    let final_value = leaf.field(ValueDepth::FinalValue);
    let sub_value = leaf.field(ValueDepth::SubValue);

    let mut title = attribute.to_string();
    if final_value.is_some() || sub_value.is_some() {
        title.push(TITLE_SEPARATOR);
        title.push_str(&segment(leaf, ValueDepth::Value, "query_value")?);
    }
    if final_value.is_some() {
        title.push(TITLE_SEPARATOR);
        title.push_str(&segment(leaf, ValueDepth::SubValue, "query_sub_value")?);
    }

    let item = final_value
        .or(sub_value)
        .or_else(|| leaf.field(ValueDepth::Value))
        .map(FieldValue::to_items)
        .unwrap_or_default();

    Ok(LeafCondition {
        title,
        action: Some(action),
        item,
        min_age: leaf.min_age,
        max_age: leaf.max_age,
    })
}

/// Canonical leaf to flat leaf
///
/// Never fails: titles unknown to the catalogue decode with text values, a
/// leaf without payload decodes with empty value fields, and a leaf whose
/// action could not be read decodes with no contain.
pub fn decode_condition(leaf: &LeafCondition, catalogue: &Catalogue) -> FlatCondition {
    let mut segments = leaf.segments();
    if segments.len() > 3 {
        warn!(title = %leaf.title, "title deeper than three levels, extra segments dropped");
        segments.truncate(3);
    }
    if !leaf.has_payload() {
        warn!(title = %leaf.title, "stored condition has no value");
    }
    if !segments.is_empty() && catalogue.lookup(&segments).is_none() {
        warn!(title = %leaf.title, "stored condition is not in the catalogue");
    }

    let path = segments.as_slice();
    let item = || FieldValue::from_items(&leaf.item, catalogue.resolve(path));
    let text = |segment: &&str| Some(FieldValue::text(*segment));

    let mut flat = FlatCondition {
        query_attribute: segments.first().map(|s| s.to_string()).filter(|s| !s.is_empty()),
        query_contain: leaf.action,
        min_age: leaf.min_age,
        max_age: leaf.max_age,
        ..Default::default()
    };

    match path {
        [] => {}
        [_] => {
            flat.query_value = item();
        }
        [_, value] => {
            flat.query_value = text(value);
            flat.query_sub_value = item();
        }
        [_, value, sub_value, ..] => {
            flat.query_value = text(value);
            flat.query_sub_value = text(sub_value);
            flat.query_final_value = item();
        }
    }

    flat
}
