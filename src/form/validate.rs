//! Submit-time validation of the flat form
//!
//! All problems are collected, each tied to the form field that shows it.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::model::{FieldValue, FlatCondition, FlatGroup, GroupPath, LeafPath, ValueDepth};
use crate::catalogue::{AttributeOption, Catalogue, ValueKind};
use crate::query::{Action, ItemValue};

/// Youngest age accepted by the age editor
pub const MIN_AGE: u32 = 1;
/// Oldest age accepted by the age editor
pub const MAX_AGE: u32 = 150;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("date pattern compiles")
});

/// Form field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    QueryType,
    QueryAttribute,
    QueryContain,
    QueryValue,
    QuerySubValue,
    QueryFinalValue,
    MinAge,
    MaxAge,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::QueryType => "query_type",
            FormField::QueryAttribute => "query_attribute",
            FormField::QueryContain => "query_contain",
            FormField::QueryValue => "query_value",
            FormField::QuerySubValue => "query_sub_value",
            FormField::QueryFinalValue => "query_final_value",
            FormField::MinAge => "min_age",
            FormField::MaxAge => "max_age",
        }
    }
}

impl From<ValueDepth> for FormField {
    fn from(depth: ValueDepth) -> Self {
        match depth {
            ValueDepth::Value => FormField::QueryValue,
            ValueDepth::SubValue => FormField::QuerySubValue,
            ValueDepth::FinalValue => FormField::QueryFinalValue,
        }
    }
}

/// Group or leaf that owns an invalid field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLocation {
    Group(GroupPath),
    Leaf(LeafPath),
}

/// One invalid field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub location: FieldLocation,
    pub field: FormField,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            FieldLocation::Group(path) if path.is_root() => {}
            FieldLocation::Group(path) => write!(f, "{}.", path)?,
            FieldLocation::Leaf(path) => write!(f, "{}.", path)?,
        }
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Every invalid field of a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Errors reported for one leaf
    pub fn for_leaf<'a>(&'a self, path: &'a LeafPath) -> impl Iterator<Item = &'a ValidationError> {
        self.0
            .iter()
            .filter(move |e| matches!(&e.location, FieldLocation::Leaf(p) if p == path))
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Validate the whole form against the catalogue
pub fn validate(form: &FlatGroup, catalogue: &Catalogue) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    validate_group(form, &GroupPath::root(), catalogue, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn validate_group(
    group: &FlatGroup,
    path: &GroupPath,
    catalogue: &Catalogue,
    errors: &mut Vec<ValidationError>,
) {
    if group.query_type.is_none() {
        errors.push(ValidationError {
            location: FieldLocation::Group(path.clone()),
            field: FormField::QueryType,
            message: "missing query type".to_string(),
        });
    }

    for (index, leaf) in group.condition.iter().enumerate() {
        let leaf_path = path.leaf(index);
        errors.extend(
            validate_condition(leaf, catalogue)
                .into_iter()
                .map(|(field, message)| ValidationError {
                    location: FieldLocation::Leaf(leaf_path.clone()),
                    field,
                    message,
                }),
        );
    }

    for (index, nested) in group.nested_condition.iter().enumerate() {
        validate_group(nested, &path.child(index), catalogue, errors);
    }
}

/// Problems of a single leaf as `(field, message)` pairs
pub fn validate_condition(leaf: &FlatCondition, catalogue: &Catalogue) -> Vec<(FormField, String)> {
    let mut errors = Vec::new();

    let Some(attribute) = leaf.query_attribute.as_deref() else {
        errors.push((FormField::QueryAttribute, "missing attribute".to_string()));
        if leaf.query_contain.is_none() {
            errors.push((FormField::QueryContain, "missing contains".to_string()));
        }
        return errors;
    };

    let kinds = leaf.resolve_kinds(catalogue);
    match leaf.query_contain {
        None => errors.push((FormField::QueryContain, "missing contains".to_string())),
        Some(action) if !kinds.operators().contains(&action) => errors.push((
            FormField::QueryContain,
            format!("operator '{}' not allowed for this attribute", action),
        )),
        Some(_) => {}
    }

    let path = leaf.catalogue_path();
    for depth in ValueDepth::ALL {
        let field = FormField::from(depth);
        let value = leaf.field(depth);
        match (kinds.depths()[depth.index()], value) {
            (Some(ValueKind::AgeRange), Some(_)) | (None, Some(_)) => {
                errors.push((field, "unexpected value".to_string()));
            }
            (Some(ValueKind::AgeRange), None) | (None, None) => {}
            (Some(_), None) => errors.push((field, "missing value".to_string())),
            (Some(kind), Some(value)) => {
                let mut parent: Vec<&str> = vec![attribute];
                parent.extend(path.iter().skip(1).take(depth.index()).map(String::as_str));
                if let Err(message) = check_value(kind, value, catalogue.children(&parent)) {
                    errors.push((field, message.to_string()));
                }
            }
        }
    }

    if kinds.is_age() {
        errors.extend(check_ages(leaf));
    } else {
        if leaf.min_age.is_some() {
            errors.push((FormField::MinAge, "unexpected age".to_string()));
        }
        if leaf.max_age.is_some() {
            errors.push((FormField::MaxAge, "unexpected age".to_string()));
        }
    }

    errors
}

fn check_ages(leaf: &FlatCondition) -> Vec<(FormField, String)> {
    let mut errors = Vec::new();
    let is_range = leaf.query_contain.as_ref().is_some_and(Action::is_range);

    let in_bounds = |age: u32| (MIN_AGE..=MAX_AGE).contains(&age);
    let out_of_bounds = || format!("age must be between {} and {}", MIN_AGE, MAX_AGE);

    match leaf.min_age {
        None if is_range => errors.push((FormField::MinAge, "Missing min age".to_string())),
        None => errors.push((FormField::MinAge, "missing age".to_string())),
        Some(age) if !in_bounds(age) => errors.push((FormField::MinAge, out_of_bounds())),
        Some(_) => {}
    }

    if !is_range {
        if leaf.max_age.is_some() {
            errors.push((FormField::MaxAge, "max age only applies to ranges".to_string()));
        }
        return errors;
    }

    match (leaf.min_age, leaf.max_age) {
        (_, None) => errors.push((FormField::MaxAge, "Missing max age".to_string())),
        (_, Some(age)) if !in_bounds(age) => errors.push((FormField::MaxAge, out_of_bounds())),
        (Some(min), Some(max)) if max < min => errors.push((
            FormField::MaxAge,
            "max age must not be less than min age".to_string(),
        )),
        _ => {}
    }

    errors
}

/// Check one value against the editor kind that produced it
///
/// `options` are the drill-down choices at that depth.
pub fn check_value(
    kind: ValueKind,
    value: &FieldValue,
    options: &[AttributeOption],
) -> Result<(), &'static str> {
    match (kind, value) {
        (ValueKind::Text, FieldValue::Scalar(item)) => {
            if item.is_blank() {
                Err("missing value")
            } else {
                Ok(())
            }
        }
        (ValueKind::Number, FieldValue::Scalar(item)) => {
            if item.is_numeric() {
                Ok(())
            } else {
                Err("expected a number")
            }
        }
        (ValueKind::Date, FieldValue::Scalar(item)) => match item {
            ItemValue::Text(text) if ISO_DATE.is_match(text.trim()) => Ok(()),
            _ => Err("expected a date (YYYY-MM-DD)"),
        },
        (ValueKind::MultiSelect, FieldValue::List(items)) => {
            if items.is_empty() || items.iter().any(ItemValue::is_blank) {
                Err("missing value")
            } else {
                Ok(())
            }
        }
        (ValueKind::MultiSelect, FieldValue::Scalar(_)) => Err("expected a list of values"),
        (ValueKind::DrillDown, FieldValue::Scalar(ItemValue::Text(text))) => {
            if options.iter().any(|option| &option.value == text) {
                Ok(())
            } else {
                Err("unknown option")
            }
        }
        (ValueKind::DrillDown, FieldValue::Scalar(_)) => Err("unknown option"),
        // Age bounds live in min_age / max_age
        (ValueKind::AgeRange, _) => Err("unexpected value"),
        (ValueKind::Text | ValueKind::Number | ValueKind::Date | ValueKind::DrillDown, FieldValue::List(_)) => {
            Err("expected a single value")
        }
    }
}
