//! Structural edits of the flat form

use super::model::{FlatCondition, FlatGroup, GroupPath, LeafPath};
use crate::error::{QueryBuilderError, Result};
use crate::query::Combinator;

fn group_not_found(path: &GroupPath) -> QueryBuilderError {
    if path.is_root() {
        QueryBuilderError::InvalidPath("root".to_string())
    } else {
        QueryBuilderError::InvalidPath(format!("no group at {}", path))
    }
}

impl FlatGroup {
    /// Group at `path` below this one
    pub fn group(&self, path: &GroupPath) -> Result<&FlatGroup> {
        let mut group = self;
        for &index in path.indices() {
            group = group
                .nested_condition
                .get(index)
                .ok_or_else(|| group_not_found(path))?;
        }
        Ok(group)
    }

    pub fn group_mut(&mut self, path: &GroupPath) -> Result<&mut FlatGroup> {
        let mut group = self;
        for &index in path.indices() {
            group = group
                .nested_condition
                .get_mut(index)
                .ok_or_else(|| group_not_found(path))?;
        }
        Ok(group)
    }

    pub fn leaf(&self, path: &LeafPath) -> Result<&FlatCondition> {
        self.group(&path.group)?
            .condition
            .get(path.index)
            .ok_or_else(|| QueryBuilderError::InvalidPath(format!("no condition at {}", path)))
    }

    pub fn leaf_mut(&mut self, path: &LeafPath) -> Result<&mut FlatCondition> {
        self.group_mut(&path.group)?
            .condition
            .get_mut(path.index)
            .ok_or_else(|| QueryBuilderError::InvalidPath(format!("no condition at {}", path)))
    }

    /// Append an empty condition to the group at `path`
    pub fn add_condition(&mut self, path: &GroupPath) -> Result<LeafPath> {
        let group = self.group_mut(path)?;
        group.condition.push(FlatCondition::default());
        Ok(path.leaf(group.condition.len() - 1))
    }

    /// Append a seeded group (one empty condition) below the group at `path`
    pub fn add_group(&mut self, path: &GroupPath) -> Result<GroupPath> {
        let group = self.group_mut(path)?;
        group.nested_condition.push(FlatGroup::seeded());
        Ok(path.child(group.nested_condition.len() - 1))
    }

    /// Append an empty condition to the existing nested group `index` of `path`
    pub fn add_nested_condition(&mut self, path: &GroupPath, index: usize) -> Result<LeafPath> {
        self.add_condition(&path.child(index))
    }

    /// Remove the condition at `index` of the group at `path`
    pub fn remove_condition(&mut self, path: &GroupPath, index: usize) -> Result<FlatCondition> {
        let group = self.group_mut(path)?;
        if index >= group.condition.len() {
            return Err(QueryBuilderError::InvalidPath(format!(
                "no condition at {}",
                path.leaf(index)
            )));
        }
        Ok(group.condition.remove(index))
    }

    /// Remove the nested group at `index` of the group at `path`
    pub fn remove_group(&mut self, path: &GroupPath, index: usize) -> Result<FlatGroup> {
        let group = self.group_mut(path)?;
        if index >= group.nested_condition.len() {
            return Err(group_not_found(&path.child(index)));
        }
        Ok(group.nested_condition.remove(index))
    }

    pub fn set_query_type(&mut self, path: &GroupPath, query_type: Option<Combinator>) -> Result<()> {
        self.group_mut(path)?.query_type = query_type;
        Ok(())
    }
}
