//! Error types for the structured query compiler.

use thiserror::Error;

/// Top-level result type for compiler operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Top-level error type for query compilation.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("unknown operator '{operator}' in term {term}")]
    UnknownOperator { operator: String, term: String },

    #[error("operator '{operator}' is not supported in dialect {dialect}")]
    UnsupportedInDialect { operator: String, dialect: String },

    #[error("{operator} requires {expected} argument(s), got {actual}")]
    ArityError {
        operator: String,
        expected: String,
        actual: usize,
    },

    #[error("'{field}' is not a queryable field{context}; acceptable fields are {accepted:?}")]
    UnqueryableField {
        field: String,
        context: String,
        accepted: Vec<String>,
    },

    #[error("bad subquery: {0}")]
    BadSubquery(String),

    #[error("value {value} must be a number for {operator} comparison")]
    TypeError { value: String, operator: String },
}
