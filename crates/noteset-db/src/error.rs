//! Database error types for noteset-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// No note has the requested id.
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// A submission would create rows while creation is disabled.
    #[error("Submission would create {count} note(s) but create_policy is disabled")]
    CreateDisabled { count: usize },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
