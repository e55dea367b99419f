//! Value kinds and per-depth kind resolution

use serde::{Deserialize, Serialize};

use crate::query::{Action, AGE_OPERATORS, DEFAULT_OPERATORS};

/// Editor/encoding kind of a catalogue node
///
/// Wire names follow the catalogue's `input_type` strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Free text, also the fallback for catalogue misses
    #[default]
    #[serde(rename = "string")]
    Text,
    #[serde(rename = "decimal")]
    Number,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "multiple")]
    MultiSelect,
    /// Edited through `min_age` / `max_age` rather than a value field
    #[serde(rename = "age")]
    AgeRange,
    /// Selection reveals a further list of child options
    #[serde(rename = "list")]
    DrillDown,
}

impl ValueKind {
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Text,
        ValueKind::Number,
        ValueKind::Date,
        ValueKind::MultiSelect,
        ValueKind::AgeRange,
        ValueKind::DrillDown,
    ];

    /// Catalogue `input_type` string
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "string",
            ValueKind::Number => "decimal",
            ValueKind::Date => "date",
            ValueKind::MultiSelect => "multiple",
            ValueKind::AgeRange => "age",
            ValueKind::DrillDown => "list",
        }
    }

    /// Operators a condition of this kind may use
    pub fn operators(&self) -> &'static [Action] {
        match self {
            ValueKind::AgeRange => &AGE_OPERATORS,
            ValueKind::Text
            | ValueKind::Number
            | ValueKind::Date
            | ValueKind::MultiSelect
            | ValueKind::DrillDown => &DEFAULT_OPERATORS,
        }
    }

    /// True if the field holds a list of values rather than a scalar
    pub fn holds_list(&self) -> bool {
        match self {
            ValueKind::MultiSelect => true,
            ValueKind::Text
            | ValueKind::Number
            | ValueKind::Date
            | ValueKind::AgeRange
            | ValueKind::DrillDown => false,
        }
    }

    #[inline]
    pub fn is_drill_down(&self) -> bool {
        matches!(self, ValueKind::DrillDown)
    }
}

/// Kinds of the three value editors of one leaf
///
/// `value` is the attribute's kind, `sub_value` the kind of the chosen value
/// (only when the attribute drills down), `final_value` the kind of the chosen
/// sub-value (only when the value drills down). `None` means the editor is
/// not shown yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedKinds {
    pub value: Option<ValueKind>,
    pub sub_value: Option<ValueKind>,
    pub final_value: Option<ValueKind>,
}

impl ResolvedKinds {
    /// Kinds in depth order
    pub fn depths(&self) -> [Option<ValueKind>; 3] {
        [self.value, self.sub_value, self.final_value]
    }

    /// True if any depth is edited as an age range
    pub fn is_age(&self) -> bool {
        self.depths().contains(&Some(ValueKind::AgeRange))
    }

    /// Operators legal for the leaf as a whole
    pub fn operators(&self) -> &'static [Action] {
        if self.is_age() {
            ValueKind::AgeRange.operators()
        } else {
            ValueKind::Text.operators()
        }
    }
}
