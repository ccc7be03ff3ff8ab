//! Error types for z-table queries and option loading

use thiserror::Error;

/// Errors returned by the z-table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZTableError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid options: {0}")]
    Config(String),
}

impl ZTableError {
    /// The error `find_z_score` reports when no leaf can be resolved.
    pub(crate) fn z_score_not_found() -> Self {
        ZTableError::NotFound("unable to find z-score given percentage".to_string())
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ZTableError::NotFound(_))
    }
}

/// Result type for z-table operations
pub type ZTableResult<T> = Result<T, ZTableError>;
