//! Catalogue configuration structures
//!
//! Mirrors the attribute data as it is shipped to the editor: a list of
//! attributes with their first-level values, plus a separate table of
//! sub-lists keyed by attribute and value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::kind::ValueKind;

/// Whole catalogue as read from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogueConfig {
    pub attributes: Vec<AttributeConfig>,
    /// Options for drill-down values: `{attribute: {value: [options]}}`
    #[serde(default)]
    pub sub_lists: HashMap<String, HashMap<String, Vec<ValueConfig>>>,
}

/// Top-level attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_type: ValueKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ValueConfig>,
}

/// Option below an attribute or in a sub-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueConfig {
    pub selected_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_type: ValueKind,
}

impl AttributeConfig {
    pub fn new(title: &str, input_type: ValueKind) -> Self {
        Self {
            title: title.to_string(),
            label: None,
            input_type,
            values: Vec::new(),
        }
    }

    pub fn with_values(mut self, values: Vec<ValueConfig>) -> Self {
        self.values = values;
        self
    }
}

impl ValueConfig {
    pub fn new(selected_value: &str, input_type: ValueKind) -> Self {
        Self {
            selected_value: selected_value.to_string(),
            label: None,
            input_type,
        }
    }
}
