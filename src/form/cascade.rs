//! Field setters with cascading resets
//!
//! Every setter clears the fields that depend on the one it changes, so a
//! leaf never keeps values picked under a previous selection. Setting a field
//! to its current value is a no-op. Empty values are stored as `None`.

use super::model::{FieldValue, FlatCondition};
use crate::query::Action;

fn normalize(value: Option<FieldValue>) -> Option<FieldValue> {
    value.filter(|value| !value.is_empty())
}

impl FlatCondition {
    /// Change the attribute; clears every other field. Returns true if changed.
    pub fn set_attribute(&mut self, attribute: Option<String>) -> bool {
        let attribute = attribute.filter(|a| !a.is_empty());
        if self.query_attribute == attribute {
            return false;
        }
        *self = FlatCondition {
            query_attribute: attribute,
            ..Default::default()
        };
        true
    }

    /// Change the operator; age bounds are cleared when the leaf is an age condition
    pub fn set_contain(&mut self, contain: Option<Action>, is_age: bool) -> bool {
        if self.query_contain == contain {
            return false;
        }
        self.query_contain = contain;
        if is_age {
            self.clear_ages();
        }
        true
    }

    /// Change the value; clears sub-value and final value
    pub fn set_value(&mut self, value: Option<FieldValue>) -> bool {
        let value = normalize(value);
        if self.query_value == value {
            return false;
        }
        self.query_value = value;
        self.query_sub_value = None;
        self.query_final_value = None;
        true
    }

    /// Change the sub-value; clears the final value
    pub fn set_sub_value(&mut self, sub_value: Option<FieldValue>) -> bool {
        let sub_value = normalize(sub_value);
        if self.query_sub_value == sub_value {
            return false;
        }
        self.query_sub_value = sub_value;
        self.query_final_value = None;
        true
    }

    pub fn set_final_value(&mut self, final_value: Option<FieldValue>) -> bool {
        let final_value = normalize(final_value);
        if self.query_final_value == final_value {
            return false;
        }
        self.query_final_value = final_value;
        true
    }

    pub fn set_min_age(&mut self, min_age: Option<u32>) {
        self.min_age = min_age;
    }

    pub fn set_max_age(&mut self, max_age: Option<u32>) {
        self.max_age = max_age;
    }

    fn clear_ages(&mut self) {
        self.min_age = None;
        self.max_age = None;
    }
}
