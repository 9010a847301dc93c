//! @ai:module:intent Define error types for search-space construction and constraint evaluation
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for all schema operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid schema for `{name}`: {message}")]
    Schema { name: String, message: String },

    #[error("Duplicate parameter name: {0}")]
    DuplicateParameter(String),

    #[error("Duplicate metric name: {0}")]
    DuplicateMetric(String),

    #[error("Duplicate objective name: {0}")]
    DuplicateObjective(String),

    #[error("Objective `{objective}` references unknown metric `{metric}`")]
    UnknownMetric { objective: String, metric: String },

    #[error("Constraint `{constraint}` depends on unknown parameter `{parameter}`")]
    UnknownParameter {
        constraint: String,
        parameter: String,
    },

    #[error("Failed to evaluate constraint `{expression}`: {message}")]
    ConstraintEvaluation { expression: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn schema(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Schema {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
