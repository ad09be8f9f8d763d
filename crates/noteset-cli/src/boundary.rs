//! Transport-independent request handling for the list editor.
//!
//! ```text
//! load    ─ list_notes ─ ListEditor::seeded ─ 200 view
//! submit  ─ intent? ── remove ─ 200 idle view (nothing written)
//!                   └─ submit ─ validate ─ invalid ─ 400 error view
//!                                       └─ apply ─ complete ─ 303 list_path
//!                                                ├─ partial  ─ 500 report
//!                                                └─ fatal    ─ 500 message
//! ```
//!
//! The HTTP server and `noteset submit` both go through [`Boundary`], so
//! they answer the same way.

use noteset_core::entities::NoteSubmission;
use noteset_core::enums::SubmitStatus;
use noteset_core::fields::{FieldErrors, FieldPath};
use noteset_core::responses::ApplyReport;
use noteset_db::service::NoteService;
use noteset_editor::{EditorView, ListEditor};
use noteset_schema::{FormData, Intent, InvalidSubmission, SubmissionValidator};
use serde::Serialize;
use serde_json::Value;

pub const OK: u16 = 200;
pub const SEE_OTHER: u16 = 303;
pub const BAD_REQUEST: u16 = 400;
pub const SERVER_ERROR: u16 = 500;

/// Body of a submit reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<EditorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ApplyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitResponse {
    fn with_view(status: SubmitStatus, view: EditorView) -> Self {
        Self {
            status,
            view: Some(view),
            report: None,
            message: None,
        }
    }

    fn partial(report: ApplyReport) -> Self {
        Self {
            status: SubmitStatus::Partial,
            view: None,
            report: Some(report),
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            status: SubmitStatus::Failed,
            view: None,
            report: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyBody {
    View(EditorView),
    Submit(SubmitResponse),
}

/// What the boundary answers. A redirect has a location and no body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ReplyBody>,
}

impl Reply {
    fn view(view: EditorView) -> Self {
        Self {
            status: OK,
            location: None,
            body: Some(ReplyBody::View(view)),
        }
    }

    fn submit(status: u16, response: SubmitResponse) -> Self {
        Self {
            status,
            location: None,
            body: Some(ReplyBody::Submit(response)),
        }
    }

    fn see_other(location: &str) -> Self {
        Self {
            status: SEE_OTHER,
            location: Some(location.to_string()),
            body: None,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status < BAD_REQUEST
    }

    /// Submit status carried by the body, if any.
    #[must_use]
    pub const fn submit_status(&self) -> Option<SubmitStatus> {
        match &self.body {
            Some(ReplyBody::Submit(response)) => Some(response.status),
            _ => None,
        }
    }
}

pub struct Boundary<'a> {
    service: &'a NoteService,
    validator: &'a SubmissionValidator,
    list_path: &'a str,
}

impl<'a> Boundary<'a> {
    #[must_use]
    pub const fn new(service: &'a NoteService, validator: &'a SubmissionValidator, list_path: &'a str) -> Self {
        Self {
            service,
            validator,
            list_path,
        }
    }

    #[must_use]
    pub const fn list_path(&self) -> &str {
        self.list_path
    }

    /// Editor seeded from the store.
    pub async fn load(&self) -> Reply {
        match self.service.list_notes().await {
            Ok(notes) => Reply::view(ListEditor::seeded(notes).view()),
            Err(error) => {
                tracing::error!(%error, "failed to load notes");
                Reply::submit(SERVER_ERROR, SubmitResponse::failed(error.to_string()))
            }
        }
    }

    /// Handle a urlencoded form post.
    pub async fn submit(&self, body: &str) -> Reply {
        let form = match FormData::parse(body) {
            Ok(form) => form,
            Err(error) => {
                let mut errors = FieldErrors::new();
                errors.insert(&FieldPath::root(), error.to_string());
                return Self::rejected(InvalidSubmission {
                    errors,
                    drafts: Vec::new(),
                });
            }
        };

        let intent = match self.validator.intent(&form) {
            Ok(intent) => intent,
            Err(invalid) => return Self::rejected(invalid),
        };

        match intent {
            Intent::Submit => match self.validator.validate(&form) {
                Ok(submission) => self.apply(&submission).await,
                Err(invalid) => Self::rejected(invalid),
            },
            remove @ Intent::Remove { .. } => {
                let drafts = remove.apply(self.validator.drafts(&form));
                tracing::debug!(%remove, remaining = drafts.len(), "list intent");
                let mut editor = ListEditor::new();
                editor.restore(drafts, &FieldErrors::new());
                Reply::submit(OK, SubmitResponse::with_view(SubmitStatus::Idle, editor.view()))
            }
        }
    }

    /// Handle a submission that is already structured, e.g. a JSON file.
    pub async fn submit_json(&self, document: Value) -> Reply {
        match self.validator.validate_value(document) {
            Ok(submission) => self.apply(&submission).await,
            Err(invalid) => Self::rejected(invalid),
        }
    }

    async fn apply(&self, submission: &NoteSubmission) -> Reply {
        match self.service.apply_submission(submission).await {
            Ok(report) if report.is_complete() => Reply::see_other(self.list_path),
            Ok(report) => Reply::submit(SERVER_ERROR, SubmitResponse::partial(report)),
            Err(error) => {
                tracing::error!(%error, "submission could not be applied");
                Reply::submit(SERVER_ERROR, SubmitResponse::failed(error.to_string()))
            }
        }
    }

    fn rejected(invalid: InvalidSubmission) -> Reply {
        let mut editor = ListEditor::new();
        editor.restore(invalid.drafts, &invalid.errors);
        Reply::submit(BAD_REQUEST, SubmitResponse::with_view(SubmitStatus::Error, editor.view()))
    }
}

#[cfg(test)]
mod tests {
    use noteset_core::entities::Note;
    use noteset_core::enums::{CreatePolicy, RowOp, SubmitStatus};
    use noteset_db::service::NoteService;
    use noteset_schema::{SubmissionValidator, ValidatorOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{BAD_REQUEST, Boundary, OK, Reply, ReplyBody, SEE_OTHER, SERVER_ERROR};

    async fn service(policy: CreatePolicy) -> NoteService {
        NoteService::new_local(":memory:", policy).await.unwrap()
    }

    fn validator(policy: CreatePolicy) -> SubmissionValidator {
        SubmissionValidator::new(ValidatorOptions {
            create_policy: policy,
            ..ValidatorOptions::default()
        })
    }

    fn submit_body(reply: &Reply) -> &super::SubmitResponse {
        match &reply.body {
            Some(ReplyBody::Submit(response)) => response,
            other => panic!("expected submit body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_seeds_view_from_store() {
        let svc = service(CreatePolicy::Disabled).await;
        let a = svc.create_note("first").await.unwrap();
        let b = svc.create_note("second").await.unwrap();
        let validator = validator(CreatePolicy::Disabled);

        let reply = Boundary::new(&svc, &validator, "/notes").load().await;

        assert_eq!(reply.status, OK);
        let Some(ReplyBody::View(view)) = reply.body else {
            panic!("expected view");
        };
        let ids: Vec<Option<i64>> = view.entries.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![Some(a.id), Some(b.id)]);
        assert_eq!(view.entries[1].content, "second");
        assert!(!view.has_errors());
    }

    #[tokio::test]
    async fn valid_submit_redirects_to_list() {
        let svc = service(CreatePolicy::Disabled).await;
        let a = svc.create_note("a").await.unwrap();
        svc.create_note("b").await.unwrap();
        let validator = validator(CreatePolicy::Disabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let body = format!("notes[0].id={}&notes[0].content=a+edited", a.id);
        let reply = boundary.submit(&body).await;

        assert_eq!(reply.status, SEE_OTHER);
        assert_eq!(reply.location.as_deref(), Some("/notes"));
        assert!(reply.body.is_none());
        assert_eq!(svc.list_notes().await.unwrap(), vec![Note::new(a.id, "a edited")]);
    }

    #[tokio::test]
    async fn invalid_submit_returns_errors_and_writes_nothing() {
        let svc = service(CreatePolicy::Disabled).await;
        let a = svc.create_note("a").await.unwrap();
        let validator = validator(CreatePolicy::Disabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let reply = boundary.submit("notes[0].content=typed").await;

        assert_eq!(reply.status, BAD_REQUEST);
        let response = submit_body(&reply);
        assert_eq!(response.status, SubmitStatus::Error);
        let view = response.view.as_ref().unwrap();
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].content, "typed");
        assert!(view.entries[0].errors.contains_key("id"));
        assert_eq!(svc.list_notes().await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn remove_intent_redisplays_without_writing() {
        let svc = service(CreatePolicy::Disabled).await;
        let a = svc.create_note("a").await.unwrap();
        let b = svc.create_note("b").await.unwrap();
        let validator = validator(CreatePolicy::Disabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let body = format!(
            "notes[0].id={}&notes[0].content=a&notes[1].id={}&notes[1].content=b&__intent__=remove%2Fnotes%2F0",
            a.id, b.id
        );
        let reply = boundary.submit(&body).await;

        assert_eq!(reply.status, OK);
        let response = submit_body(&reply);
        assert_eq!(response.status, SubmitStatus::Idle);
        let view = response.view.as_ref().unwrap();
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].id, Some(b.id));
        assert_eq!(svc.count_notes().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_intent_is_a_field_error() {
        let svc = service(CreatePolicy::Disabled).await;
        let validator = validator(CreatePolicy::Disabled);
        let reply = Boundary::new(&svc, &validator, "/notes")
            .submit("__intent__=explode")
            .await;

        assert_eq!(reply.status, BAD_REQUEST);
        let view = submit_body(&reply).view.as_ref().unwrap();
        assert!(view.form_errors.iter().any(|error| error.starts_with("__intent__")));
    }

    #[tokio::test]
    async fn row_failure_reports_partial() {
        let svc = service(CreatePolicy::Disabled).await;
        let a = svc.create_note("a").await.unwrap();
        svc.db()
            .conn()
            .execute_batch(
                "CREATE TRIGGER no_boom BEFORE UPDATE ON notes WHEN NEW.content = 'boom'
                 BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
            )
            .await
            .unwrap();
        let validator = validator(CreatePolicy::Disabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let reply = boundary
            .submit(&format!("notes[0].id={}&notes[0].content=boom", a.id))
            .await;

        assert_eq!(reply.status, SERVER_ERROR);
        let response = submit_body(&reply);
        assert_eq!(response.status, SubmitStatus::Partial);
        let report = response.report.as_ref().unwrap();
        assert_eq!(report.failed_ids(), vec![Some(a.id)]);
        assert_eq!(report.outcomes[0].op, RowOp::Upsert);
    }

    #[tokio::test]
    async fn broken_store_fails_whole_submission() {
        let svc = service(CreatePolicy::Disabled).await;
        svc.db().conn().execute_batch("DROP TABLE notes;").await.unwrap();
        let validator = validator(CreatePolicy::Disabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let reply = boundary.submit("").await;
        assert_eq!(reply.status, SERVER_ERROR);
        assert_eq!(reply.submit_status(), Some(SubmitStatus::Failed));
        assert!(submit_body(&reply).message.is_some());

        assert_eq!(boundary.load().await.status, SERVER_ERROR);
    }

    #[tokio::test]
    async fn drafts_are_created_when_enabled() {
        let svc = service(CreatePolicy::Enabled).await;
        let validator = validator(CreatePolicy::Enabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let reply = boundary.submit("notes[0].id=&notes[0].content=fresh").await;

        assert_eq!(reply.status, SEE_OTHER);
        let notes = svc.list_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "fresh");
    }

    #[tokio::test]
    async fn json_submission_goes_through_same_checks() {
        let svc = service(CreatePolicy::Disabled).await;
        let a = svc.create_note("a").await.unwrap();
        let validator = validator(CreatePolicy::Disabled);
        let boundary = Boundary::new(&svc, &validator, "/notes");

        let reply = boundary
            .submit_json(json!({"notes": [{"id": a.id, "content": "from json"}]}))
            .await;
        assert_eq!(reply.status, SEE_OTHER);
        assert_eq!(svc.get_note(a.id).await.unwrap().content, "from json");

        let reply = boundary.submit_json(json!({"notes": [{"content": 5}]})).await;
        assert_eq!(reply.status, BAD_REQUEST);
    }

    #[test]
    fn reply_body_serializes_with_status_tag() {
        let reply = Reply::submit(
            SERVER_ERROR,
            super::SubmitResponse::failed("store unavailable"),
        );
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            json!({"status": 500, "body": {"status": "failed", "message": "store unavailable"}})
        );
    }
}
