//! Note repository: single-row operations on `notes`.
//!
//! Every operation is one statement and therefore atomic on its own. There
//! is no multi-row transaction.

use noteset_core::entities::Note;

use crate::error::DatabaseError;
use crate::service::NoteService;

/// What `upsert_note` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated,
    Inserted,
}

fn row_to_note(row: &libsql::Row) -> Result<Note, DatabaseError> {
    Ok(Note {
        id: row.get::<i64>(0)?,
        content: row.get::<String>(1)?,
    })
}

impl NoteService {
    /// All notes in store order (ascending id, which is insertion order).
    pub async fn list_notes(&self) -> Result<Vec<Note>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id, content FROM notes ORDER BY id", ())
            .await?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            notes.push(row_to_note(&row)?);
        }
        Ok(notes)
    }

    pub async fn get_note(&self, id: i64) -> Result<Note, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id, content FROM notes WHERE id = ?1", libsql::params![id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoteNotFound(id))?;
        row_to_note(&row)
    }

    pub async fn count_notes(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM notes", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|e| DatabaseError::Query(format!("negative count {count}: {e}")))
    }

    /// Insert a note with a store-assigned id.
    pub async fn create_note(&self, content: &str) -> Result<Note, DatabaseError> {
        self.db()
            .conn()
            .execute("INSERT INTO notes (content) VALUES (?1)", libsql::params![content])
            .await?;
        let id = self.db().conn().last_insert_rowid();
        tracing::debug!(id, "note created");
        Ok(Note::new(id, content))
    }

    /// Delete by id. Returns `false` if no such row existed.
    pub async fn delete_note(&self, id: i64) -> Result<bool, DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM notes WHERE id = ?1", libsql::params![id])
            .await?;
        Ok(affected > 0)
    }

    /// Rewrite the content of an existing row. Returns `false` if no row has
    /// `note.id`; nothing is inserted.
    pub async fn update_note(&self, note: &Note) -> Result<bool, DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE notes SET content = ?1 WHERE id = ?2",
                libsql::params![note.content.as_str(), note.id],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Update the row with `note.id`, or insert it under that id.
    pub async fn upsert_note(&self, note: &Note) -> Result<UpsertOutcome, DatabaseError> {
        if self.update_note(note).await? {
            return Ok(UpsertOutcome::Updated);
        }
        self.db()
            .conn()
            .execute(
                "INSERT INTO notes (id, content) VALUES (?1, ?2)",
                libsql::params![note.id, note.content.as_str()],
            )
            .await?;
        Ok(UpsertOutcome::Inserted)
    }
}
