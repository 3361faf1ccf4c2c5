/// Structured error types for movies-core.
///
/// Library consumers get `thiserror` enums; the `movies` binary wraps them
/// in `anyhow` with context.
use thiserror::Error;

/// Main error type for movies-core operations
#[derive(Error, Debug)]
pub enum MoviesError {
    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Required field missing from a document
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Document id is neither a string nor an integer
    #[error("Invalid document id in {context}: {value}")]
    InvalidId { value: String, context: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for movies-core operations
pub type Result<T> = std::result::Result<T, MoviesError>;

impl MoviesError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn invalid_id(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::InvalidId {
            value: value.into(),
            context: context.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
