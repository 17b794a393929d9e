//! Error types and boundary validation for the search engine

use thiserror::Error;

use crate::search::Field;

/// Longest query accepted at the boundary, in characters
pub const MAX_QUERY_CHARS: usize = 500;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Search query is required")]
    EmptyQuery,
    #[error("Query too long: maximum {max} characters, got {actual}")]
    QueryTooLong { max: usize, actual: usize },
    #[error("Invalid weight for field '{field}': {weight}")]
    InvalidWeight { field: Field, weight: f64 },
    #[error("At least one field must have a positive weight")]
    NoWeightedField,
    #[error("Invalid threshold: {0} (expected a value between 0 and 1)")]
    InvalidThreshold(f64),
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    #[error("No index has been built for this session")]
    NotIndexed,
}

impl SearchError {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            SearchError::EmptyQuery => "empty_query",
            SearchError::QueryTooLong { .. } => "query_too_long",
            SearchError::InvalidWeight { .. } => "invalid_weight",
            SearchError::NoWeightedField => "no_weighted_field",
            SearchError::InvalidThreshold(_) => "invalid_threshold",
            SearchError::InvalidOption(_) => "invalid_option",
            SearchError::NotIndexed => "not_indexed",
        }
    }

    /// Whether the error comes from caller-supplied configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidWeight { .. }
                | SearchError::NoWeightedField
                | SearchError::InvalidThreshold(_)
                | SearchError::InvalidOption(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Reject empty and oversized queries before they reach the matcher
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let actual = query.chars().count();
    if actual > MAX_QUERY_CHARS {
        return Err(SearchError::QueryTooLong {
            max: MAX_QUERY_CHARS,
            actual,
        });
    }

    Ok(())
}
