//! Attribute catalogue module
//!
//! The catalogue is the static, read-only tree of selectable attributes. It
//! answers two questions for the editor and the codecs: which kind of value
//! lives at a path, and which child options a drill-down path offers.

mod config;
mod defaults;
mod kind;
mod option;

pub use config::*;
pub use defaults::*;
pub use kind::*;
pub use option::*;

use ahash::AHashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{QueryBuilderError, Result};
use crate::query::TITLE_SEPARATOR;

/// Read-only attribute tree
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    attributes: Vec<AttributeOption>,
    index: OptionIndex,
}

impl Catalogue {
    /// Build a catalogue from already constructed options
    pub fn new(attributes: Vec<AttributeOption>) -> Self {
        let index = OptionIndex::build(&attributes);
        Self { attributes, index }
    }

    /// Validate a configuration and build the catalogue from it
    pub fn from_config(config: &CatalogueConfig) -> Result<Self> {
        validate_config(config)?;
        Ok(Self::build(config))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CatalogueConfig = serde_json::from_str(json)?;
        Self::from_config(&config)
    }

    /// Load a catalogue from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalogue = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            attributes = catalogue.attributes.len(),
            "loaded catalogue"
        );
        Ok(catalogue)
    }

    /// Build without validation; sub-list entries are attached below their value
    pub(crate) fn build(config: &CatalogueConfig) -> Self {
        let mut attributes: Vec<AttributeOption> = config
            .attributes
            .iter()
            .map(|attribute| {
                let children = attribute.values.iter().map(option_from_value).collect();
                let option = AttributeOption::new(attribute.title.clone(), attribute.input_type)
                    .with_children(children);
                match &attribute.label {
                    Some(label) => option.with_label(label.clone()),
                    None => option,
                }
            })
            .collect();

        for (attribute, lists) in &config.sub_lists {
            let Some(parent) = attributes.iter_mut().find(|o| &o.value == attribute) else {
                continue;
            };
            for (value, options) in lists {
                if let Some(owner) = parent.children_mut().iter_mut().find(|o| &o.value == value) {
                    *owner = owner
                        .clone()
                        .with_children(options.iter().map(option_from_value).collect());
                }
            }
            parent.reindex();
        }

        Self::new(attributes)
    }

    /// Top-level attributes in catalogue order
    pub fn attributes(&self) -> &[AttributeOption] {
        &self.attributes
    }

    /// Option at `path` (attribute, value, sub-value), if the catalogue has it
    pub fn lookup(&self, path: &[&str]) -> Option<&AttributeOption> {
        let (first, rest) = path.split_first()?;
        let mut node = self.index.find(&self.attributes, first)?;
        for segment in rest {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Kind at `path`
    ///
    /// The empty path is the catalogue root and resolves to
    /// [`ValueKind::DrillDown`]; unknown paths resolve to [`ValueKind::Text`].
    pub fn resolve(&self, path: &[&str]) -> ValueKind {
        if path.is_empty() {
            return ValueKind::DrillDown;
        }
        match self.lookup(path) {
            Some(option) => option.value_kind,
            None => {
                debug!(path = ?path, "catalogue miss, using text");
                ValueKind::Text
            }
        }
    }

    /// Child options at `path`; the empty path lists the attributes
    pub fn children(&self, path: &[&str]) -> &[AttributeOption] {
        if path.is_empty() {
            return &self.attributes;
        }
        self.lookup(path).map(AttributeOption::children).unwrap_or(&[])
    }

    /// Kinds of the value, sub-value and final-value editors of one leaf
    pub fn resolve_kinds(
        &self,
        attribute: Option<&str>,
        value: Option<&str>,
        sub_value: Option<&str>,
    ) -> ResolvedKinds {
        let mut kinds = ResolvedKinds::default();
        let Some(attribute) = attribute else {
            return kinds;
        };

        let depth0 = self.resolve(&[attribute]);
        kinds.value = Some(depth0);
        if !depth0.is_drill_down() {
            return kinds;
        }

        let Some(value) = value else {
            return kinds;
        };
        let depth1 = self.resolve(&[attribute, value]);
        kinds.sub_value = Some(depth1);
        if !depth1.is_drill_down() {
            return kinds;
        }

        if let Some(sub_value) = sub_value {
            kinds.final_value = Some(self.resolve(&[attribute, value, sub_value]));
        }
        kinds
    }
}

fn option_from_value(value: &ValueConfig) -> AttributeOption {
    let option = AttributeOption::new(value.selected_value.clone(), value.input_type);
    match &value.label {
        Some(label) => option.with_label(label.clone()),
        None => option,
    }
}

fn invalid(message: String) -> QueryBuilderError {
    QueryBuilderError::InvalidCatalogue(message)
}

fn check_siblings<'a>(scope: &str, values: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = AHashSet::new();
    for value in values {
        if value.trim().is_empty() {
            return Err(invalid(format!("empty value in {}", scope)));
        }
        if value.contains(TITLE_SEPARATOR) {
            return Err(invalid(format!(
                "value '{}' in {} contains '{}'",
                value, scope, TITLE_SEPARATOR
            )));
        }
        if !seen.insert(value) {
            return Err(invalid(format!("duplicate value '{}' in {}", value, scope)));
        }
    }
    Ok(())
}

fn validate_config(config: &CatalogueConfig) -> Result<()> {
    check_siblings(
        "attributes",
        config.attributes.iter().map(|a| a.title.as_str()),
    )?;

    for attribute in &config.attributes {
        if !attribute.values.is_empty() && !attribute.input_type.is_drill_down() {
            return Err(invalid(format!(
                "attribute '{}' lists values but is not a drill-down",
                attribute.title
            )));
        }
        check_siblings(
            &attribute.title,
            attribute.values.iter().map(|v| v.selected_value.as_str()),
        )?;
    }

    for (attribute, lists) in &config.sub_lists {
        let parent = config
            .attributes
            .iter()
            .find(|a| &a.title == attribute)
            .ok_or_else(|| invalid(format!("sub-list for unknown attribute '{}'", attribute)))?;

        for (value, options) in lists {
            let owner = parent
                .values
                .iter()
                .find(|v| &v.selected_value == value)
                .ok_or_else(|| {
                    invalid(format!("sub-list for unknown value '{}.{}'", attribute, value))
                })?;
            if !owner.input_type.is_drill_down() {
                return Err(invalid(format!(
                    "sub-list for '{}.{}' which is not a drill-down",
                    attribute, value
                )));
            }

            let scope = format!("{}.{}", attribute, value);
            check_siblings(&scope, options.iter().map(|o| o.selected_value.as_str()))?;
            if let Some(deep) = options.iter().find(|o| o.input_type.is_drill_down()) {
                return Err(invalid(format!(
                    "'{}.{}' drills down past three levels",
                    scope, deep.selected_value
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        let catalogue = default_catalogue();
        assert_eq!(catalogue.resolve(&[]), ValueKind::DrillDown);
        assert_eq!(catalogue.resolve(&["Status"]), ValueKind::Text);
        assert_eq!(catalogue.resolve(&["Profile holder age"]), ValueKind::AgeRange);
        assert_eq!(catalogue.resolve(&["Communication"]), ValueKind::DrillDown);
        assert_eq!(catalogue.resolve(&["Communication", "SMS"]), ValueKind::DrillDown);
        assert_eq!(
            catalogue.resolve(&["Communication", "SMS", "Content"]),
            ValueKind::Text
        );
        assert_eq!(
            catalogue.resolve(&["Appointment", "Appointment ID"]),
            ValueKind::Number
        );
    }

    #[test]
    fn test_miss_defaults_to_text() {
        let catalogue = default_catalogue();
        assert_eq!(catalogue.resolve(&["Billing"]), ValueKind::Text);
        assert_eq!(catalogue.resolve(&["Communication", "Fax"]), ValueKind::Text);
        assert!(catalogue.lookup(&["Communication", "Fax"]).is_none());
    }

    #[test]
    fn test_children() {
        let catalogue = default_catalogue();
        assert_eq!(catalogue.children(&[]).len(), 4);

        let values: Vec<_> = catalogue
            .children(&["Communication"])
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(values, vec!["Whatsapp", "SMS", "Email"]);

        assert_eq!(catalogue.children(&["Communication", "Email"]).len(), 3);
        assert!(catalogue.children(&["Status"]).is_empty());
        assert!(catalogue.children(&["Nope"]).is_empty());
    }

    #[test]
    fn test_resolve_kinds() {
        let catalogue = default_catalogue();

        let kinds = catalogue.resolve_kinds(Some("Communication"), Some("Whatsapp"), Some("Content"));
        assert_eq!(kinds.value, Some(ValueKind::DrillDown));
        assert_eq!(kinds.sub_value, Some(ValueKind::DrillDown));
        assert_eq!(kinds.final_value, Some(ValueKind::Text));

        let kinds = catalogue.resolve_kinds(Some("Appointment"), Some("Doctor Name"), None);
        assert_eq!(kinds.sub_value, Some(ValueKind::Text));
        assert_eq!(kinds.final_value, None);

        let kinds = catalogue.resolve_kinds(Some("Profile holder age"), None, None);
        assert!(kinds.is_age());

        assert_eq!(catalogue.resolve_kinds(None, Some("x"), None), ResolvedKinds::default());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "attributes": [
                {"title": "Plan", "input_type": "list", "values": [
                    {"selected_value": "Tier", "input_type": "list"},
                    {"selected_value": "Seats", "input_type": "decimal"}
                ]},
                {"title": "Signup", "label": "Signup date", "input_type": "date"}
            ],
            "sub_lists": {
                "Plan": {"Tier": [{"selected_value": "Name", "input_type": "multiple"}]}
            }
        }"#;
        let catalogue = Catalogue::from_json_str(json).unwrap();
        assert_eq!(catalogue.resolve(&["Plan", "Tier", "Name"]), ValueKind::MultiSelect);
        assert_eq!(catalogue.lookup(&["Signup"]).unwrap().label, "Signup date");
    }

    #[test]
    fn test_rejects_dotted_value() {
        let config = CatalogueConfig {
            attributes: vec![AttributeConfig::new("a.b", ValueKind::Text)],
            ..Default::default()
        };
        let err = Catalogue::from_config(&config).unwrap_err();
        assert!(matches!(err, QueryBuilderError::InvalidCatalogue(_)));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_nesting() {
        let duplicate = CatalogueConfig {
            attributes: vec![
                AttributeConfig::new("Status", ValueKind::Text),
                AttributeConfig::new("Status", ValueKind::Date),
            ],
            ..Default::default()
        };
        assert!(Catalogue::from_config(&duplicate).is_err());

        let values_on_text = CatalogueConfig {
            attributes: vec![AttributeConfig::new("Status", ValueKind::Text)
                .with_values(vec![ValueConfig::new("Active", ValueKind::Text)])],
            ..Default::default()
        };
        assert!(Catalogue::from_config(&values_on_text).is_err());

        let mut too_deep = CatalogueConfig {
            attributes: vec![AttributeConfig::new("A", ValueKind::DrillDown)
                .with_values(vec![ValueConfig::new("B", ValueKind::DrillDown)])],
            ..Default::default()
        };
        too_deep.sub_lists.entry("A".into()).or_default().insert(
            "B".into(),
            vec![ValueConfig::new("C", ValueKind::DrillDown)],
        );
        assert!(Catalogue::from_config(&too_deep).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Catalogue::from_json_file("non_existent_catalogue.json");
        assert!(matches!(result, Err(QueryBuilderError::Io(_))));
    }
}
