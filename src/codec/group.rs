//! Group codec
//!
//! The flat form keeps leaves and nested groups in two lists; the canonical
//! group keeps one mixed list. Folding emits leaves first, then groups, each in
//! their original order. Unfolding partitions the mixed list back.

use super::condition::{decode_condition, encode_condition};
use crate::catalogue::Catalogue;
use crate::error::{QueryBuilderError, Result};
use crate::form::FlatGroup;
use crate::query::{Group, Node};

/// Canonical children of a flat group: encoded leaves, then folded groups
pub(crate) fn fold_children(flat: &FlatGroup) -> Result<Vec<Node>> {
    let mut nodes = Vec::with_capacity(flat.condition.len() + flat.nested_condition.len());
    for leaf in &flat.condition {
        nodes.push(Node::Leaf(encode_condition(leaf)?));
    }
    for group in &flat.nested_condition {
        nodes.push(Node::Group(fold_group(group)?));
    }
    Ok(nodes)
}

/// Flat group to canonical group
pub fn fold_group(flat: &FlatGroup) -> Result<Group> {
    let query_type = flat
        .query_type
        .ok_or(QueryBuilderError::Incomplete("query_type"))?;
    Ok(Group {
        query_type: Some(query_type),
        condition: fold_children(flat)?,
    })
}

/// Split a mixed canonical list into flat leaves and flat groups
pub(crate) fn unfold_children(nodes: &[Node], catalogue: &Catalogue, flat: &mut FlatGroup) {
    flat.condition = nodes
        .iter()
        .filter_map(Node::as_leaf)
        .map(|leaf| decode_condition(leaf, catalogue))
        .collect();
    flat.nested_condition = nodes
        .iter()
        .filter_map(Node::as_group)
        .map(|group| unfold_group(group, catalogue))
        .collect();
}

/// Canonical group to flat group
pub fn unfold_group(group: &Group, catalogue: &Catalogue) -> FlatGroup {
    let mut flat = FlatGroup::new(group.query_type);
    unfold_children(&group.condition, catalogue, &mut flat);
    flat
}
