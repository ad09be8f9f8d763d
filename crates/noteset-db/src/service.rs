//! Service layer over the note store.
//!
//! `NoteService` wraps `NoteDb` and the configured `CreatePolicy`. Repository
//! methods and the apply step are implemented as `impl NoteService` blocks in
//! their own modules.

use noteset_core::enums::CreatePolicy;

use crate::NoteDb;
use crate::error::DatabaseError;

pub struct NoteService {
    db: NoteDb,
    create_policy: CreatePolicy,
}

impl NoteService {
    /// Open the database at `db_path` (or `":memory:"`) and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, create_policy: CreatePolicy) -> Result<Self, DatabaseError> {
        let db = NoteDb::open_local(db_path).await?;
        Ok(Self::from_db(db, create_policy))
    }

    /// Create from an existing `NoteDb`.
    #[must_use]
    pub const fn from_db(db: NoteDb, create_policy: CreatePolicy) -> Self {
        Self { db, create_policy }
    }

    #[must_use]
    pub const fn db(&self) -> &NoteDb {
        &self.db
    }

    #[must_use]
    pub const fn create_policy(&self) -> CreatePolicy {
        self.create_policy
    }
}
