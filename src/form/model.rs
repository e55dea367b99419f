//! Flat, editor-facing form
//!
//! A [`FlatGroup`] keeps leaves and nested groups in two separate lists and a
//! [`FlatCondition`] spreads the dotted title over discrete fields. Nodes are
//! addressed by index paths.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::catalogue::{Catalogue, ResolvedKinds, ValueKind};
use crate::query::{deserialize_age_bound, Action, Combinator, ItemValue};

/// Value held by one of the value/sub-value/final-value fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    List(Vec<ItemValue>),
    Scalar(ItemValue),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Scalar(ItemValue::Text(value.into()))
    }

    /// True for an empty list or empty text
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Scalar(ItemValue::Text(text)) => text.is_empty(),
            FieldValue::Scalar(_) => false,
        }
    }

    /// Title segment for a drill-down selection
    pub fn as_segment(&self) -> Option<String> {
        match self {
            FieldValue::Scalar(item) => Some(item.to_string()),
            FieldValue::List(items) if items.len() == 1 => Some(items[0].to_string()),
            FieldValue::List(_) => None,
        }
    }

    /// Item list of the canonical form; scalars become one-element lists
    pub fn to_items(&self) -> Vec<ItemValue> {
        match self {
            FieldValue::List(items) => items.clone(),
            FieldValue::Scalar(item) => vec![item.clone()],
        }
    }

    /// Field value for a stored item list, shaped by the editor kind
    pub fn from_items(items: &[ItemValue], kind: ValueKind) -> Option<Self> {
        match items {
            [] => None,
            _ if kind.holds_list() => Some(FieldValue::List(items.to_vec())),
            [single] => Some(FieldValue::Scalar(single.clone())),
            _ => Some(FieldValue::List(items.to_vec())),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl From<ItemValue> for FieldValue {
    fn from(value: ItemValue) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<ItemValue>> for FieldValue {
    fn from(value: Vec<ItemValue>) -> Self {
        FieldValue::List(value)
    }
}

/// Which of the three value fields of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDepth {
    Value,
    SubValue,
    FinalValue,
}

impl ValueDepth {
    pub const ALL: [ValueDepth; 3] = [ValueDepth::Value, ValueDepth::SubValue, ValueDepth::FinalValue];

    pub fn index(&self) -> usize {
        match self {
            ValueDepth::Value => 0,
            ValueDepth::SubValue => 1,
            ValueDepth::FinalValue => 2,
        }
    }
}

/// Editable leaf condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_contain: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_sub_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_final_value: Option<FieldValue>,
    #[serde(
        default,
        deserialize_with = "deserialize_age_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_age: Option<u32>,
    #[serde(
        default,
        deserialize_with = "deserialize_age_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<u32>,
}

impl FlatCondition {
    pub fn field(&self, depth: ValueDepth) -> Option<&FieldValue> {
        let value = match depth {
            ValueDepth::Value => self.query_value.as_ref(),
            ValueDepth::SubValue => self.query_sub_value.as_ref(),
            ValueDepth::FinalValue => self.query_final_value.as_ref(),
        };
        value.filter(|value| !value.is_empty())
    }

    /// Catalogue path selected so far, stopping at the first gap
    pub fn catalogue_path(&self) -> SmallVec<[String; 3]> {
        let mut path = SmallVec::new();
        let Some(attribute) = self.query_attribute.as_ref() else {
            return path;
        };
        path.push(attribute.clone());
        for depth in [ValueDepth::Value, ValueDepth::SubValue] {
            match self.field(depth).and_then(FieldValue::as_segment) {
                Some(segment) => path.push(segment),
                None => break,
            }
        }
        path
    }

    /// Kinds of this leaf's value editors
    pub fn resolve_kinds(&self, catalogue: &Catalogue) -> ResolvedKinds {
        let path = self.catalogue_path();
        catalogue.resolve_kinds(
            path.first().map(String::as_str),
            path.get(1).map(String::as_str),
            path.get(2).map(String::as_str),
        )
    }

    /// True if no populated value field follows an empty one
    pub fn is_well_formed(&self) -> bool {
        let populated = ValueDepth::ALL.map(|depth| self.field(depth).is_some());
        let attribute = self.query_attribute.is_some();
        (attribute || !populated.iter().any(|p| *p))
            && (populated[0] || !populated[1])
            && (populated[1] || !populated[2])
    }
}

/// Editable group; the form root is a group as well
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<Combinator>,
    #[serde(default)]
    pub condition: Vec<FlatCondition>,
    #[serde(default)]
    pub nested_condition: Vec<FlatGroup>,
}

impl FlatGroup {
    pub fn new(query_type: Option<Combinator>) -> Self {
        Self {
            query_type,
            ..Default::default()
        }
    }

    /// Fresh group as added by the editor: no type, one empty condition
    pub fn seeded() -> Self {
        Self {
            query_type: None,
            condition: vec![FlatCondition::default()],
            nested_condition: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of leaves and groups below this group
    pub fn node_count(&self) -> usize {
        self.condition.len()
            + self
                .nested_condition
                .iter()
                .map(|group| 1 + group.node_count())
                .sum::<usize>()
    }
}

/// Path from the form root to a group, as `nested_condition` indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupPath(SmallVec<[usize; 4]>);

impl GroupPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the nested group at `index` below this one
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    /// Path of the leaf at `index` in this group
    pub fn leaf(&self, index: usize) -> LeafPath {
        LeafPath {
            group: self.clone(),
            index,
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[usize]> for GroupPath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for GroupPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.into_iter().collect())
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "nested_condition.{}", index)?;
        }
        Ok(())
    }
}

/// Path from the form root to a leaf
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LeafPath {
    pub group: GroupPath,
    pub index: usize,
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_root() {
            write!(f, "condition.{}", self.index)
        } else {
            write!(f, "{}.condition.{}", self.group, self.index)
        }
    }
}
