//! Shared test utilities for noteset-db unit tests.

pub(crate) mod helpers {
    use noteset_core::enums::CreatePolicy;

    use crate::service::NoteService;
    use crate::{IN_MEMORY, NoteDb};

    /// In-memory service with creation disabled.
    pub async fn test_service() -> NoteService {
        test_service_with(CreatePolicy::Disabled).await
    }

    pub async fn test_service_with(policy: CreatePolicy) -> NoteService {
        let db = NoteDb::open_local(IN_MEMORY).await.unwrap();
        NoteService::from_db(db, policy)
    }

    /// Insert notes in order and return their ids.
    pub async fn seed(svc: &NoteService, contents: &[&str]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(contents.len());
        for content in contents {
            ids.push(svc.create_note(content).await.unwrap().id);
        }
        ids
    }

    /// Make every write of `content` fail with a constraint error.
    pub async fn reject_content(svc: &NoteService, content: &str) {
        let sql = format!(
            "CREATE TRIGGER reject_update BEFORE UPDATE ON notes WHEN NEW.content = '{content}'
             BEGIN SELECT RAISE(ABORT, 'content rejected'); END;
             CREATE TRIGGER reject_insert BEFORE INSERT ON notes WHEN NEW.content = '{content}'
             BEGIN SELECT RAISE(ABORT, 'content rejected'); END;"
        );
        svc.db().conn().execute_batch(&sql).await.unwrap();
    }

    /// Make deleting the row with `id` fail.
    pub async fn protect_row(svc: &NoteService, id: i64) {
        let sql = format!(
            "CREATE TRIGGER protect_row BEFORE DELETE ON notes WHEN OLD.id = {id}
             BEGIN SELECT RAISE(ABORT, 'row is protected'); END;"
        );
        svc.db().conn().execute_batch(&sql).await.unwrap();
    }
}
