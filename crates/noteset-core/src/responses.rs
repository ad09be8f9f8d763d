//! Response types returned as JSON by the `noteset` CLI and HTTP boundary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Note;
use crate::enums::RowOp;

/// Full note collection in store order (initial page load, `noteset list`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NotesPage {
    pub notes: Vec<Note>,
}

/// Result of one row operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowStatus {
    /// The row was deleted, rewritten, or created.
    Applied,
    /// An upsert found no row and inserted one under the submitted id.
    Inserted,
    /// The row did not exist, so nothing changed.
    Absent,
    /// The store rejected the operation.
    Failed { message: String },
}

/// Outcome of one row operation while applying a plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RowOutcome {
    pub op: RowOp,
    /// Row id. For creates this is the id the store assigned, if any.
    pub id: Option<i64>,
    #[serde(flatten)]
    pub status: RowStatus,
}

impl RowOutcome {
    #[must_use]
    pub const fn new(op: RowOp, id: Option<i64>, status: RowStatus) -> Self {
        Self { op, id, status }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.status, RowStatus::Failed { .. })
    }
}

/// Every row outcome of one applied submission, in the order applied.
///
/// A report is complete only when no row failed. Partial success is reported
/// as such, never folded into an all-succeeded response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ApplyReport {
    pub outcomes: Vec<RowOutcome>,
}

impl ApplyReport {
    pub fn push(&mut self, outcome: RowOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.outcomes.iter().any(RowOutcome::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }

    /// Number of outcomes of `op` that changed the store.
    #[must_use]
    pub fn applied(&self, op: RowOp) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| {
                outcome.op == op
                    && matches!(outcome.status, RowStatus::Applied | RowStatus::Inserted)
            })
            .count()
    }

    /// Number of outcomes that found no row to act on.
    #[must_use]
    pub fn absent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == RowStatus::Absent)
            .count()
    }

    /// Ids of failed rows, in the order they were attempted.
    #[must_use]
    pub fn failed_ids(&self) -> Vec<Option<i64>> {
        self.failures().map(|outcome| outcome.id).collect()
    }
}
