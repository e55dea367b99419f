//! Operators, combinators and scalar values carried by conditions

use serde::{Deserialize, Serialize};
use std::fmt;

/// How sibling entries of one `condition` list combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub const ALL: [Combinator; 2] = [Combinator::And, Combinator::Or];

    /// Stable wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }

    /// Display label for the combinator picker
    pub fn label(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

/// Comparison operator of a leaf condition
///
/// Age conditions use the relational operators, every other kind uses
/// [`Action::Contains`] / [`Action::NotContains`]. See
/// [`ValueKind::operators`](crate::catalogue::ValueKind::operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Contains,
    NotContains,
    Equal,
    NotEqual,
    Between,
    NotBetween,
    GreaterThan,
    LessThan,
    GreaterThanEqual,
    LessThanEqual,
}

/// Operators offered for every non-age kind
pub const DEFAULT_OPERATORS: [Action; 2] = [Action::Contains, Action::NotContains];

/// Operators offered for age ranges
pub const AGE_OPERATORS: [Action; 8] = [
    Action::Equal,
    Action::NotEqual,
    Action::Between,
    Action::NotBetween,
    Action::GreaterThan,
    Action::LessThan,
    Action::GreaterThanEqual,
    Action::LessThanEqual,
];

impl Action {
    /// Stable wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Contains => "contains",
            Action::NotContains => "not-contains",
            Action::Equal => "equal",
            Action::NotEqual => "not-equal",
            Action::Between => "between",
            Action::NotBetween => "not-between",
            Action::GreaterThan => "greater-than",
            Action::LessThan => "less-than",
            Action::GreaterThanEqual => "greater-than-equal",
            Action::LessThanEqual => "less-than-equal",
        }
    }

    /// Display label for the operator picker
    pub fn label(&self) -> &'static str {
        match self {
            Action::Contains => "Contains",
            Action::NotContains => "Not contains",
            Action::Equal => "equal",
            Action::NotEqual => "not equal",
            Action::Between => "between",
            Action::NotBetween => "not between",
            Action::GreaterThan => "greater than",
            Action::LessThan => "less than",
            Action::GreaterThanEqual => "greater than or equal",
            Action::LessThanEqual => "less than or equal",
        }
    }

    /// True for operators that need both `min_age` and `max_age`
    #[inline]
    pub fn is_range(&self) -> bool {
        matches!(self, Action::Between | Action::NotBetween)
    }

    /// True for operators that belong to the age operator set
    #[inline]
    pub fn is_age_operator(&self) -> bool {
        AGE_OPERATORS.contains(self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a condition's `item` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ItemValue {
    /// True for text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            ItemValue::Text(text) => text.trim().is_empty(),
            ItemValue::Integer(_) | ItemValue::Float(_) => false,
        }
    }

    /// True if the value is a number, or text that parses as one
    pub fn is_numeric(&self) -> bool {
        match self {
            ItemValue::Integer(_) => true,
            ItemValue::Float(f) => f.is_finite(),
            ItemValue::Text(text) => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ItemValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Integer(i) => write!(f, "{}", i),
            ItemValue::Float(v) => write!(f, "{}", v),
            ItemValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        ItemValue::Text(value.to_string())
    }
}

impl From<String> for ItemValue {
    fn from(value: String) -> Self {
        ItemValue::Text(value)
    }
}

impl From<i64> for ItemValue {
    fn from(value: i64) -> Self {
        ItemValue::Integer(value)
    }
}

impl From<f64> for ItemValue {
    fn from(value: f64) -> Self {
        ItemValue::Float(value)
    }
}
