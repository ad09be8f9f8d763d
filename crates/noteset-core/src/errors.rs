//! Cross-cutting error types for Noteset.
//!
//! Domain-specific errors (`DatabaseError`, `SchemaError`, `ConfigError`) are
//! defined in their respective crates and converge in `noteset-cli` through
//! `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A field path could not be parsed.
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}
