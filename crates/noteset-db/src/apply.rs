//! Apply step of list reconciliation.
//!
//! ```text
//! list_notes ─ reconcile ─ deletes ─ upserts ─ creates ─ ApplyReport
//! ```
//!
//! Loading the store is the only fatal step. After that every row operation
//! is awaited in turn and its outcome recorded; a failed row does not stop
//! the rows after it. There is no transaction spanning rows.

use noteset_core::entities::{Note, NoteSubmission};
use noteset_core::enums::RowOp;
use noteset_core::reconcile::{ReconcilePlan, reconcile};
use noteset_core::responses::{ApplyReport, RowOutcome, RowStatus};

use crate::error::DatabaseError;
use crate::repos::UpsertOutcome;
use crate::service::NoteService;

impl NoteService {
    /// Plan a submission against the current store without writing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store cannot be read.
    pub async fn plan_submission(&self, submission: &NoteSubmission) -> Result<ReconcilePlan, DatabaseError> {
        let store = self.list_notes().await?;
        Ok(reconcile(&store, &submission.notes))
    }

    /// Bring the store in line with `submission` and report every row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store cannot be read, or
    /// `DatabaseError::CreateDisabled` if the submission has id-less entries
    /// and creation is disabled. Row failures are not errors; they are
    /// recorded in the report.
    pub async fn apply_submission(&self, submission: &NoteSubmission) -> Result<ApplyReport, DatabaseError> {
        let plan = self.plan_submission(submission).await?;
        self.apply_plan(&plan).await
    }

    /// Execute a plan row by row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::CreateDisabled` before any write if the plan
    /// has creates and creation is disabled.
    pub async fn apply_plan(&self, plan: &ReconcilePlan) -> Result<ApplyReport, DatabaseError> {
        if plan.has_creates() && !self.create_policy().allows_create() {
            return Err(DatabaseError::CreateDisabled {
                count: plan.to_create.len(),
            });
        }

        let mut report = ApplyReport::default();

        for &id in &plan.to_delete {
            let status = match self.delete_note(id).await {
                Ok(true) => RowStatus::Applied,
                Ok(false) => RowStatus::Absent,
                Err(e) => failed(RowOp::Delete, Some(id), &e),
            };
            tracing::debug!(id, ?status, "delete");
            report.push(RowOutcome::new(RowOp::Delete, Some(id), status));
        }

        for note in &plan.to_upsert {
            let status = self.apply_upsert(note).await;
            tracing::debug!(id = note.id, ?status, "upsert");
            report.push(RowOutcome::new(RowOp::Upsert, Some(note.id), status));
        }

        for content in &plan.to_create {
            let outcome = match self.create_note(content).await {
                Ok(note) => RowOutcome::new(RowOp::Create, Some(note.id), RowStatus::Applied),
                Err(e) => RowOutcome::new(RowOp::Create, None, failed(RowOp::Create, None, &e)),
            };
            report.push(outcome);
        }

        if report.is_complete() {
            tracing::info!(
                deleted = report.applied(RowOp::Delete),
                upserted = report.applied(RowOp::Upsert),
                created = report.applied(RowOp::Create),
                absent = report.absent(),
                "submission applied"
            );
        } else {
            tracing::warn!(
                failed = report.failures().count(),
                total = report.outcomes.len(),
                "submission partially applied"
            );
        }
        Ok(report)
    }

    async fn apply_upsert(&self, note: &Note) -> RowStatus {
        if self.create_policy().allows_create() {
            match self.upsert_note(note).await {
                Ok(UpsertOutcome::Updated) => RowStatus::Applied,
                Ok(UpsertOutcome::Inserted) => RowStatus::Inserted,
                Err(e) => failed(RowOp::Upsert, Some(note.id), &e),
            }
        } else {
            match self.update_note(note).await {
                Ok(true) => RowStatus::Applied,
                Ok(false) => RowStatus::Absent,
                Err(e) => failed(RowOp::Upsert, Some(note.id), &e),
            }
        }
    }
}

fn failed(op: RowOp, id: Option<i64>, error: &DatabaseError) -> RowStatus {
    tracing::warn!(%op, ?id, %error, "row operation failed");
    RowStatus::Failed {
        message: error.to_string(),
    }
}
