//! Schema validation error types.

use thiserror::Error;

/// Errors from the schema registry and form decoding.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// The request body is not valid form encoding.
    #[error("Malformed form body: {0}")]
    MalformedForm(String),

    /// The `__intent__` form value names no known intent.
    #[error("Unknown intent: {0}")]
    InvalidIntent(String),
}
