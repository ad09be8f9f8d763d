//! # noteset-db
//!
//! libSQL storage for the note list and the apply step of reconciliation.
//!
//! `NoteDb` owns the database and its single connection; `NoteService` adds
//! the create policy and hosts the note repository and `apply_submission`,
//! which turns a validated submission into row operations and reports the
//! outcome of every one of them.

pub mod apply;
pub mod error;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// In-memory database path, used by tests and throwaway runs.
pub const IN_MEMORY: &str = ":memory:";

/// Database handle for the note store.
pub struct NoteDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl NoteDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let note_db = Self { db, conn };
        note_db.run_migrations().await?;
        tracing::debug!(path, "note store opened");
        Ok(note_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> NoteDb {
        NoteDb::open_local(IN_MEMORY).await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                ["notes"],
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some(), "table 'notes' should exist");
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_a_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let path = path.to_str().unwrap();

        {
            let db = NoteDb::open_local(path).await.unwrap();
            db.conn()
                .execute("INSERT INTO notes (content) VALUES (?1)", ["kept"])
                .await
                .unwrap();
        }

        let db = NoteDb::open_local(path).await.unwrap();
        let mut rows = db.conn().query("SELECT content FROM notes", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "kept");
    }
}
