//! Error types for reckon-core.
//!
//! Errors are split by the stage that raises them: configuration errors are
//! raised once when an [`Evaluator`](crate::Evaluator) is constructed,
//! evaluation errors abort a single `evaluate` call, and dataset errors come
//! from reading interaction files.

use crate::table::{ItemId, UserId};
use thiserror::Error;

/// Errors raised while validating evaluator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field has the wrong shape (e.g. a string where a list of integers is expected)
    #[error("Invalid type for `{field}`: {message}")]
    Type {
        field: &'static str,
        message: String,
    },
    /// A field has the right shape but an unacceptable value
    #[error("Invalid value for `{field}`: {message}")]
    Value {
        field: &'static str,
        message: String,
    },
    /// A metric name that is not in the registry
    #[error("There is no metric named `{0}`")]
    UnknownMetric(String),
    /// The configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn type_error(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Type {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn value_error(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Value {
            field,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Errors that abort a single evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Column sequences handed to the pipeline have different lengths
    #[error("Shape mismatch in {what}: {details}")]
    ShapeMismatch { what: &'static str, details: String },
    /// The same (user, item) pair was predicted more than once
    #[error("Duplicate prediction for user {user}, item {item}")]
    DuplicatePrediction { user: UserId, item: ItemId },
    /// Grouped evaluation was requested without per-user activity counts
    #[error("Grouped evaluation requires user activity counts")]
    MissingUserActivity,
    /// The worker pool for parallel scoring could not be built
    #[error("Failed to start scoring workers: {0}")]
    WorkerPool(String),
}

/// Errors that can occur while loading interaction files.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// IO error reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Required file does not exist
    #[error("Missing file: {0}")]
    MissingFile(String),
    /// A line could not be parsed
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Parsed columns could not be assembled into a table
    #[error(transparent)]
    Eval(#[from] EvalError),
}
