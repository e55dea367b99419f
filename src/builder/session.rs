//! QueryBuilder - editing session over one query
//!
//! Owns the flat form between load and submit. Edits go through the form's
//! path operations and cascading setters; submit validates, folds and keeps the
//! resulting tree.

use std::sync::Arc;
use tracing::{debug, info};

use crate::catalogue::{default_catalogue, AttributeOption, Catalogue, ResolvedKinds};
use crate::codec::{fold_query, unfold_query};
use crate::error::{QueryBuilderError, Result};
use crate::form::{
    validate, FieldValue, FlatCondition, FlatGroup, GroupPath, LeafPath, ValidationErrors,
    ValueDepth,
};
use crate::query::{Action, Combinator, QueryTree, DEFAULT_QUERY_ID};

/// Editing session: one catalogue, one form, the last submitted tree
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    catalogue: Arc<Catalogue>,
    form: FlatGroup,
    query_id: u64,
    submitted: Option<QueryTree>,
}

impl QueryBuilder {
    /// Empty session; the root starts with one empty condition
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self {
            catalogue,
            form: FlatGroup::seeded(),
            query_id: DEFAULT_QUERY_ID,
            submitted: None,
        }
    }

    pub fn with_default_catalogue() -> Self {
        Self::new(default_catalogue())
    }

    /// Session editing a stored query; keeps its id for the next submit
    pub fn load(catalogue: Arc<Catalogue>, tree: &QueryTree) -> Self {
        let form = unfold_query(tree, &catalogue);
        info!(query_id = tree.query_id, nodes = tree.node_count(), "loaded query");
        Self {
            catalogue,
            form,
            query_id: tree.query_id,
            submitted: None,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn form(&self) -> &FlatGroup {
        &self.form
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn query_id(&self) -> u64 {
        self.query_id
    }

    /// Tree produced by the last successful submit
    pub fn submitted(&self) -> Option<&QueryTree> {
        self.submitted.as_ref()
    }

    // ------------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------------

    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        validate(&self.form, &self.catalogue)
    }

    /// Validate and fold the form; the new tree replaces the previous one
    pub fn submit(&mut self) -> Result<&QueryTree> {
        self.validate().map_err(|errors| {
            debug!(errors = errors.len(), "submit blocked");
            QueryBuilderError::Validation(errors)
        })?;
        let tree = fold_query(&self.form, self.query_id)?;
        info!(query_id = tree.query_id, nodes = tree.node_count(), "submitted query");
        Ok(&*self.submitted.insert(tree))
    }

    // ------------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------------

    pub fn add_condition(&mut self, group: &GroupPath) -> Result<LeafPath> {
        self.form.add_condition(group)
    }

    pub fn add_group(&mut self, group: &GroupPath) -> Result<GroupPath> {
        self.form.add_group(group)
    }

    pub fn add_nested_condition(&mut self, group: &GroupPath, index: usize) -> Result<LeafPath> {
        self.form.add_nested_condition(group, index)
    }

    pub fn remove_condition(&mut self, group: &GroupPath, index: usize) -> Result<FlatCondition> {
        self.form.remove_condition(group, index)
    }

    pub fn remove_group(&mut self, group: &GroupPath, index: usize) -> Result<FlatGroup> {
        self.form.remove_group(group, index)
    }

    pub fn set_query_type(&mut self, group: &GroupPath, query_type: Option<Combinator>) -> Result<()> {
        self.form.set_query_type(group, query_type)
    }

    // ------------------------------------------------------------------------
    // Editor helpers
    // ------------------------------------------------------------------------

    pub fn kinds(&self, leaf: &LeafPath) -> Result<ResolvedKinds> {
        Ok(self.form.leaf(leaf)?.resolve_kinds(&self.catalogue))
    }

    /// Actions the operator select offers for this leaf
    pub fn operators(&self, leaf: &LeafPath) -> Result<&'static [Action]> {
        Ok(self.kinds(leaf)?.operators())
    }

    /// Options of the drill-down select at `depth`; empty when that depth is not a drill-down
    pub fn editor_options(&self, leaf: &LeafPath, depth: ValueDepth) -> Result<&[AttributeOption]> {
        let condition = self.form.leaf(leaf)?;
        let kinds = condition.resolve_kinds(&self.catalogue);
        if !kinds.depths()[depth.index()].is_some_and(|kind| kind.is_drill_down()) {
            return Ok(&[]);
        }
        let path = condition.catalogue_path();
        let Some(path) = path.get(..=depth.index()) else {
            return Ok(&[]);
        };
        let path: Vec<&str> = path.iter().map(String::as_str).collect();
        Ok(self.catalogue.children(&path))
    }

    // ------------------------------------------------------------------------
    // Leaf setters
    // ------------------------------------------------------------------------

    pub fn set_attribute(&mut self, leaf: &LeafPath, attribute: Option<String>) -> Result<bool> {
        Ok(self.form.leaf_mut(leaf)?.set_attribute(attribute))
    }

    /// Change the action; age bounds reset when the leaf is an age condition
    pub fn set_contain(&mut self, leaf: &LeafPath, contain: Option<Action>) -> Result<bool> {
        let is_age = self.kinds(leaf)?.is_age();
        Ok(self.form.leaf_mut(leaf)?.set_contain(contain, is_age))
    }

    pub fn set_value(&mut self, leaf: &LeafPath, value: Option<FieldValue>) -> Result<bool> {
        Ok(self.form.leaf_mut(leaf)?.set_value(value))
    }

    pub fn set_sub_value(&mut self, leaf: &LeafPath, value: Option<FieldValue>) -> Result<bool> {
        Ok(self.form.leaf_mut(leaf)?.set_sub_value(value))
    }

    pub fn set_final_value(&mut self, leaf: &LeafPath, value: Option<FieldValue>) -> Result<bool> {
        Ok(self.form.leaf_mut(leaf)?.set_final_value(value))
    }

    pub fn set_min_age(&mut self, leaf: &LeafPath, age: Option<u32>) -> Result<()> {
        self.form.leaf_mut(leaf)?.set_min_age(age);
        Ok(())
    }

    pub fn set_max_age(&mut self, leaf: &LeafPath, age: Option<u32>) -> Result<()> {
        self.form.leaf_mut(leaf)?.set_max_age(age);
        Ok(())
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::with_default_catalogue()
    }
}
