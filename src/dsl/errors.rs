//! Request decoding errors
//!
//! Error codes:
//! - QC_DSL_NOT_AN_OBJECT
//! - QC_DSL_EMPTY_CLAUSE
//! - QC_DSL_MULTIPLE_KINDS
//! - QC_DSL_INVALID_BOOL_CLAUSE
//! - QC_DSL_DUPLICATE_AGGREGATIONS
//! - QC_DSL_MISSING_AGGREGATION_KIND

use thiserror::Error;

/// Result type for request decoding
pub type DslResult<T> = Result<T, DslError>;

/// Request decoding errors. Every variant carries the JSON path it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DslError {
    #[error("Expected an object at {path}, found {found}")]
    NotAnObject { path: String, found: &'static str },

    #[error("Empty clause at {path}")]
    EmptyClause { path: String },

    #[error("Clause at {path} names more than one kind: {kinds}")]
    MultipleKinds { path: String, kinds: String },

    #[error("Bool clause '{key}' at {path} must be an object or an array of objects")]
    InvalidBoolClause { path: String, key: String },

    #[error("Both 'aggs' and 'aggregations' given at {path}")]
    DuplicateAggregationsKey { path: String },

    #[error("Aggregation at {path} has no kind")]
    MissingAggregationKind { path: String },
}

impl DslError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DslError::NotAnObject { .. } => "QC_DSL_NOT_AN_OBJECT",
            DslError::EmptyClause { .. } => "QC_DSL_EMPTY_CLAUSE",
            DslError::MultipleKinds { .. } => "QC_DSL_MULTIPLE_KINDS",
            DslError::InvalidBoolClause { .. } => "QC_DSL_INVALID_BOOL_CLAUSE",
            DslError::DuplicateAggregationsKey { .. } => "QC_DSL_DUPLICATE_AGGREGATIONS",
            DslError::MissingAggregationKind { .. } => "QC_DSL_MISSING_AGGREGATION_KIND",
        }
    }

    /// Returns the JSON path the error refers to
    pub fn path(&self) -> &str {
        match self {
            DslError::NotAnObject { path, .. }
            | DslError::EmptyClause { path }
            | DslError::MultipleKinds { path, .. }
            | DslError::InvalidBoolClause { path, .. }
            | DslError::DuplicateAggregationsKey { path }
            | DslError::MissingAggregationKind { path } => path,
        }
    }
}
