//! Root assembly: flat form root <-> [`QueryTree`]

use tracing::debug;

use super::group::{fold_children, unfold_children};
use crate::catalogue::Catalogue;
use crate::error::{QueryBuilderError, Result};
use crate::form::FlatGroup;
use crate::query::QueryTree;

/// Fold the form root into a query tree carrying `query_id`
pub fn fold_query(form: &FlatGroup, query_id: u64) -> Result<QueryTree> {
    let query_type = form
        .query_type
        .ok_or(QueryBuilderError::Incomplete("query_type"))?;
    let tree = QueryTree {
        query_id,
        query_type: Some(query_type),
        condition: fold_children(form)?,
    };
    debug!(query_id, nodes = tree.node_count(), "folded form");
    Ok(tree)
}

/// Unfold a stored query tree into a form root
pub fn unfold_query(tree: &QueryTree, catalogue: &Catalogue) -> FlatGroup {
    let mut form = FlatGroup::new(tree.query_type);
    unfold_children(&tree.condition, catalogue, &mut form);
    debug!(
        query_id = tree.query_id,
        nodes = form.node_count(),
        "unfolded query"
    );
    form
}
