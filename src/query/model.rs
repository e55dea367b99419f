//! Canonical query tree
//!
//! This is the storage/execution-facing shape. Leaves and groups share one
//! ordered `condition` list per level; on the wire they are told apart by the
//! `is_group` flag, in memory by [`Node`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::value::{Action, Combinator, ItemValue};
use super::wire::deserialize_lenient;
use crate::error::Result;

/// Separator between catalogue values in a leaf title
pub const TITLE_SEPARATOR: char = '.';

/// Identifier given to a freshly submitted query
pub const DEFAULT_QUERY_ID: u64 = 1;

/// Leaf condition, e.g. `Communication.Whatsapp.Content contains ["checkup"]`
#[derive(Debug, Clone, PartialEq)]
pub struct LeafCondition {
    /// Dot-joined catalogue path of 1-3 values
    pub title: String,
    /// `None` only for stored leaves whose action could not be read
    pub action: Option<Action>,
    pub item: Vec<ItemValue>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl LeafCondition {
    /// Title split into its catalogue segments
    pub fn segments(&self) -> SmallVec<[&str; 3]> {
        if self.title.is_empty() {
            return SmallVec::new();
        }
        self.title.split(TITLE_SEPARATOR).collect()
    }

    /// True if either the item list or an age bound carries a value
    pub fn has_payload(&self) -> bool {
        !self.item.is_empty() || self.min_age.is_some() || self.max_age.is_some()
    }
}

/// Nested group of conditions
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// `None` only for stored groups whose type could not be read
    pub query_type: Option<Combinator>,
    pub condition: Vec<Node>,
}

impl Group {
    pub fn new(query_type: Combinator) -> Self {
        Self {
            query_type: Some(query_type),
            condition: Vec::new(),
        }
    }

    /// Direct leaf conditions, in list order
    pub fn leaves(&self) -> impl Iterator<Item = &LeafCondition> {
        leaves_of(&self.condition)
    }

    /// Direct nested groups, in list order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        groups_of(&self.condition)
    }

    /// Number of leaves and groups below this group
    pub fn node_count(&self) -> usize {
        count_nodes(&self.condition)
    }
}

/// One entry of a `condition` list
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(LeafCondition),
    Group(Group),
}

impl Node {
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafCondition> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(group) => Some(group),
            Node::Leaf(_) => None,
        }
    }
}

impl From<LeafCondition> for Node {
    fn from(leaf: LeafCondition) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

/// Root of a canonical query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTree {
    pub query_id: u64,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub query_type: Option<Combinator>,
    #[serde(default)]
    pub condition: Vec<Node>,
}

impl QueryTree {
    pub fn new(query_id: u64, query_type: Combinator) -> Self {
        Self {
            query_id,
            query_type: Some(query_type),
            condition: Vec::new(),
        }
    }

    /// Parse a stored query
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &LeafCondition> {
        leaves_of(&self.condition)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        groups_of(&self.condition)
    }

    /// Number of leaves and groups in the whole tree
    pub fn node_count(&self) -> usize {
        count_nodes(&self.condition)
    }
}

fn leaves_of(nodes: &[Node]) -> impl Iterator<Item = &LeafCondition> {
    nodes.iter().filter_map(Node::as_leaf)
}

fn groups_of(nodes: &[Node]) -> impl Iterator<Item = &Group> {
    nodes.iter().filter_map(Node::as_group)
}

fn count_nodes(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Leaf(_) => 1,
            Node::Group(group) => 1 + group.node_count(),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(title: &str) -> LeafCondition {
        LeafCondition {
            title: title.to_string(),
            action: Some(Action::Contains),
            item: vec![ItemValue::from("x")],
            min_age: None,
            max_age: None,
        }
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            leaf("Communication.Whatsapp.Content").segments().as_slice(),
            &["Communication", "Whatsapp", "Content"]
        );
        assert_eq!(leaf("Status").segments().as_slice(), &["Status"]);
        assert!(leaf("").segments().is_empty());
    }

    #[test]
    fn test_payload() {
        let mut empty = leaf("Status");
        empty.item.clear();
        assert!(!empty.has_payload());
        empty.min_age = Some(18);
        assert!(empty.has_payload());
    }

    #[test]
    fn test_node_count_and_partition() {
        let mut inner = Group::new(Combinator::Or);
        inner.condition.push(leaf("Status").into());
        let tree = QueryTree {
            query_id: DEFAULT_QUERY_ID,
            query_type: Some(Combinator::And),
            condition: vec![inner.into(), leaf("Status").into()],
        };

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.leaves().count(), 1);
        assert_eq!(tree.groups().count(), 1);
    }
}
