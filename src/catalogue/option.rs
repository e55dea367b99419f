//! Catalogue option tree

use ahash::AHashMap;

use super::kind::ValueKind;

/// Lookup from option value to its position among siblings
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionIndex(AHashMap<String, usize>);

impl OptionIndex {
    pub(crate) fn build(options: &[AttributeOption]) -> Self {
        let mut map = AHashMap::with_capacity(options.len());
        for (i, option) in options.iter().enumerate() {
            // First occurrence wins, matching a linear scan
            map.entry(option.value.clone()).or_insert(i);
        }
        Self(map)
    }

    #[inline]
    pub(crate) fn find<'a>(
        &self,
        options: &'a [AttributeOption],
        value: &str,
    ) -> Option<&'a AttributeOption> {
        self.0.get(value).map(|&i| &options[i])
    }
}

/// One selectable catalogue entry
#[derive(Debug, Clone)]
pub struct AttributeOption {
    pub value: String,
    pub label: String,
    pub value_kind: ValueKind,
    children: Vec<AttributeOption>,
    index: OptionIndex,
}

impl AttributeOption {
    pub fn new(value: impl Into<String>, value_kind: ValueKind) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            value_kind,
            children: Vec::new(),
            index: OptionIndex::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_children(mut self, children: Vec<AttributeOption>) -> Self {
        self.index = OptionIndex::build(&children);
        self.children = children;
        self
    }

    /// Ordered child options, empty for terminal kinds
    pub fn children(&self) -> &[AttributeOption] {
        &self.children
    }

    pub fn child(&self, value: &str) -> Option<&AttributeOption> {
        self.index.find(&self.children, value)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<AttributeOption> {
        &mut self.children
    }

    pub(crate) fn reindex(&mut self) {
        self.index = OptionIndex::build(&self.children);
    }
}

/// Options whose label contains `input`, ignoring case and surrounding blanks
pub fn filter_options<'a>(options: &'a [AttributeOption], input: &str) -> Vec<&'a AttributeOption> {
    let needle = input.trim().to_lowercase();
    options
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .collect()
}
