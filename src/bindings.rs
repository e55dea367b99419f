//! Python bindings
//!
//! A catalogue is cached once with `init_catalogue`; the codec functions take
//! and return JSON text so Python callers never build Rust types.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::prelude::*;
use std::sync::Arc;
use tracing::info;

use crate::catalogue::{default_catalogue, Catalogue};
use crate::codec;
use crate::error::QueryBuilderError;
use crate::form::{self, FlatGroup};
use crate::query::QueryTree;

// ============================================================================
// Cached Catalogue
// ============================================================================

static CACHED_CATALOGUE: OnceCell<Arc<RwLock<Arc<Catalogue>>>> = OnceCell::new();

fn cached_catalogue() -> Result<Arc<Catalogue>, QueryBuilderError> {
    let cached = CACHED_CATALOGUE
        .get()
        .ok_or(QueryBuilderError::NotInitialized)?;
    let catalogue = Arc::clone(&cached.read());
    Ok(catalogue)
}

/// Replace the cached catalogue, creating the cache on first use
fn store_catalogue(catalogue: Arc<Catalogue>) {
    let cached = CACHED_CATALOGUE.get_or_init(|| Arc::new(RwLock::new(Arc::clone(&catalogue))));
    *cached.write() = catalogue;
}

// ============================================================================
// Python Functions
// ============================================================================

/// Cache the attribute catalogue (call once at startup)
///
/// # Arguments
/// * `json` - Catalogue configuration as JSON text; the built-in catalogue when omitted
#[pyfunction]
#[pyo3(signature = (json=None))]
fn init_catalogue(json: Option<&str>) -> PyResult<()> {
    let catalogue = match json {
        Some(json) => Arc::new(Catalogue::from_json_str(json)?),
        None => default_catalogue(),
    };
    info!(attributes = catalogue.attributes().len(), "catalogue initialized");

    store_catalogue(catalogue);
    Ok(())
}

#[pyfunction]
fn is_catalogue_initialized() -> bool {
    CACHED_CATALOGUE.get().is_some()
}

/// Validate a flat form and fold it into a query tree
///
/// # Returns
/// The query tree as JSON text
///
/// # Raises
/// ValueError if the form is malformed or fails validation,
/// RuntimeError if `init_catalogue` was not called first
#[pyfunction]
#[pyo3(signature = (form_json, query_id=1))]
fn fold_form(form_json: &str, query_id: u64) -> PyResult<String> {
    let catalogue = cached_catalogue()?;
    let form = FlatGroup::from_json_str(form_json)?;
    form::validate(&form, &catalogue).map_err(QueryBuilderError::Validation)?;
    Ok(codec::fold_query(&form, query_id)?.to_json()?)
}

/// Unfold a stored query tree into a flat form (JSON in, JSON out)
#[pyfunction]
fn unfold_query(query_json: &str) -> PyResult<String> {
    let catalogue = cached_catalogue()?;
    let tree = QueryTree::from_json_str(query_json)?;
    Ok(codec::unfold_query(&tree, &catalogue).to_json()?)
}

/// Validation messages for a flat form; empty when the form can be submitted
#[pyfunction]
fn validate_form(form_json: &str) -> PyResult<Vec<String>> {
    let catalogue = cached_catalogue()?;
    let form = FlatGroup::from_json_str(form_json)?;
    Ok(match form::validate(&form, &catalogue) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

#[pymodule]
fn query_rule_builder(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_catalogue, m)?)?;
    m.add_function(wrap_pyfunction!(is_catalogue_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(fold_form, m)?)?;
    m.add_function(wrap_pyfunction!(unfold_query, m)?)?;
    m.add_function(wrap_pyfunction!(validate_form, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_store_catalogue_keeps_last_write() {
        let catalogues: Vec<Arc<Catalogue>> = (0..8)
            .map(|_| Arc::new(Catalogue::clone(&default_catalogue())))
            .collect();

        let handles: Vec<_> = catalogues
            .iter()
            .map(|catalogue| {
                let catalogue = Arc::clone(catalogue);
                thread::spawn(move || store_catalogue(catalogue))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cached = cached_catalogue().unwrap();
        assert!(catalogues.iter().any(|c| Arc::ptr_eq(c, &cached)));

        let latest = Arc::new(Catalogue::clone(&default_catalogue()));
        store_catalogue(Arc::clone(&latest));
        assert!(Arc::ptr_eq(&cached_catalogue().unwrap(), &latest));
        assert!(is_catalogue_initialized());
    }
}
