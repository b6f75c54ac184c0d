//! Error types for the split timer

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, SplitterError>;

/// Errors raised while importing, evaluating or persisting splits
#[derive(Debug, Error)]
pub enum SplitterError {
    /// The split document is malformed; the whole import is rejected
    #[error("invalid split schema: {0}")]
    SchemaInvalid(String),

    /// A condition string could not be turned into a predicate
    #[error("split {index}: condition failed to compile: {message}")]
    ConditionCompile { index: usize, message: String },

    /// A predicate failed while being evaluated
    #[error("condition evaluation failed: {0}")]
    ConditionRuntime(String),

    /// The persistence gateway could not load or save
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl SplitterError {
    /// Create a schema validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::SchemaInvalid(message.into())
    }

    /// Create a compile error for the split at `index`
    pub fn compile(index: usize, message: impl Into<String>) -> Self {
        Self::ConditionCompile {
            index,
            message: message.into(),
        }
    }

    /// Whether this error rejects an import (as opposed to an I/O failure)
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::SchemaInvalid(_) | Self::ConditionCompile { .. } | Self::Json(_)
        )
    }
}
