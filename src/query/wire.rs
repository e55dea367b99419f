//! Wire format of the canonical tree
//!
//! Leaves carry `is_group: false` and groups `is_group: true`. An absent age
//! bound is written as `""` and read back from `""`, `null` or a missing key.
//!
//! Reading never rejects a node over its content: an unreadable action, query
//! type, age bound or item entry is dropped with a warning so the rest of a
//! stored tree still loads.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::model::{Group, LeafCondition, Node};
use super::value::{Action, Combinator, ItemValue};

/// Age bound as written on the wire
struct AgeBound(Option<u32>);

impl Serialize for AgeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(age) => serializer.serialize_u32(age),
            None => serializer.serialize_str(""),
        }
    }
}

/// Whole age for a stored number; fractions round to the nearest year
fn age_from_f64(age: f64) -> Option<u32> {
    if !(0.0..=f64::from(u32::MAX)).contains(&age) {
        warn!(value = age, "ignoring out of range age bound");
        return None;
    }
    if age.fract() != 0.0 {
        warn!(value = age, "rounding fractional age bound");
    }
    Some(age.round() as u32)
}

fn age_from_value(raw: Value) -> Option<u32> {
    match raw {
        Value::Null => None,
        Value::Number(number) => match number.as_u64() {
            Some(age) => u32::try_from(age).ok().or_else(|| age_from_f64(age as f64)),
            None => number.as_f64().and_then(age_from_f64),
        },
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else if let Ok(age) = trimmed.parse::<u32>() {
                Some(age)
            } else if let Ok(age) = trimmed.parse::<f64>() {
                age_from_f64(age)
            } else {
                warn!(value = %text, "ignoring unparsable age bound");
                None
            }
        }
        other => {
            warn!(value = %other, "ignoring unparsable age bound");
            None
        }
    }
}

/// Lenient age reader shared by the canonical and flat shapes
pub(crate) fn deserialize_age_bound<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(age_from_value))
}

/// Parse a stored value, or `None` with a warning when it does not fit `T`
fn read_lenient<T: DeserializeOwned>(value: Value) -> Option<T> {
    match &value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        _ => match T::deserialize(&value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(value = %value, error = %err, "ignoring unreadable stored value");
                None
            }
        },
    }
}

/// Field reader for enums that may be missing, empty or unknown in stored data
pub(crate) fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(read_lenient))
}

/// `item` as stored: normally a list, a bare scalar is tolerated
fn read_items(title: &str, raw: Option<Value>) -> Vec<ItemValue> {
    let entries = match raw {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(single) => vec![single],
    };
    entries
        .into_iter()
        .filter_map(|entry| match ItemValue::deserialize(&entry) {
            Ok(item) => Some(item),
            Err(_) => {
                warn!(title = %title, value = %entry, "dropping unreadable item");
                None
            }
        })
        .collect()
}

/// Union of the leaf and group wire fields
#[derive(Deserialize)]
struct WireNode {
    #[serde(default)]
    is_group: bool,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    action: Option<Action>,
    #[serde(default)]
    item: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_age_bound")]
    min_age: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_age_bound")]
    max_age: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    query_type: Option<Combinator>,
    #[serde(default)]
    condition: Vec<Node>,
}

impl From<WireNode> for Node {
    fn from(wire: WireNode) -> Self {
        if wire.is_group {
            if wire.query_type.is_none() {
                warn!("stored group has no query type");
            }
            return Node::Group(Group {
                query_type: wire.query_type,
                condition: wire.condition,
            });
        }

        let title = wire.title.unwrap_or_default();
        if wire.action.is_none() {
            warn!(title = %title, "stored condition has no action");
        }
        let item = read_items(&title, wire.item);

        Node::Leaf(LeafCondition {
            title,
            action: wire.action,
            item,
            min_age: wire.min_age,
            max_age: wire.max_age,
        })
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WireNode::deserialize(deserializer).map(Node::from)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(leaf) => {
                let mut state = serializer.serialize_struct("LeafCondition", 6)?;
                state.serialize_field("title", &leaf.title)?;
                match &leaf.action {
                    Some(action) => state.serialize_field("action", action)?,
                    None => state.skip_field("action")?,
                }
                state.serialize_field("item", &leaf.item)?;
                state.serialize_field("min_age", &AgeBound(leaf.min_age))?;
                state.serialize_field("max_age", &AgeBound(leaf.max_age))?;
                state.serialize_field("is_group", &false)?;
                state.end()
            }
            Node::Group(group) => {
                let mut state = serializer.serialize_struct("Group", 3)?;
                match &group.query_type {
                    Some(query_type) => state.serialize_field("query_type", query_type)?,
                    None => state.skip_field("query_type")?,
                }
                state.serialize_field("is_group", &true)?;
                state.serialize_field("condition", &group.condition)?;
                state.end()
            }
        }
    }
}
