//! Error types for the query rule builder

use crate::form::ValidationErrors;
use thiserror::Error;

/// Main error type for the query rule builder
#[derive(Error, Debug)]
pub enum QueryBuilderError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Incomplete form: missing {0}")]
    Incomplete(&'static str),

    #[error("Invalid catalogue: {0}")]
    InvalidCatalogue(String),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalogue not initialized")]
    NotInitialized,
}

#[cfg(feature = "python")]
impl From<QueryBuilderError> for pyo3::PyErr {
    fn from(err: QueryBuilderError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};

        match err {
            QueryBuilderError::InvalidPath(msg) => {
                PyIndexError::new_err(format!("Invalid path: {}", msg))
            }
            QueryBuilderError::NotInitialized => PyRuntimeError::new_err(
                "Catalogue not initialized. Call init_catalogue() first.",
            ),
            QueryBuilderError::Io(e) => PyRuntimeError::new_err(format!("IO error: {}", e)),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Result type alias for the query rule builder
pub type Result<T> = std::result::Result<T, QueryBuilderError>;
