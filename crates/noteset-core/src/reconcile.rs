//! List reconciliation engine.
//!
//! Compares a submitted note list against the notes currently in the store,
//! keyed on `id`, and derives the row operations that bring the store in line
//! with the submission:
//!
//! ```text
//! to_delete = store ids − submitted ids         (store order)
//! to_upsert = submitted entries carrying an id  (submission order)
//! to_create = submitted entries without an id   (submission order)
//! ```
//!
//! Unchanged entries are upserted too. Re-writing a row with its current
//! content is a no-op at the store, and it keeps the engine a single pass
//! with no value diffing. The plan is applied deletes first, then upserts,
//! then creates.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Note, SubmittedNote};

/// Row operations needed to bring the store in line with one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReconcilePlan {
    pub to_delete: Vec<i64>,
    pub to_upsert: Vec<Note>,
    pub to_create: Vec<String>,
}

impl ReconcilePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_upsert.is_empty() && self.to_create.is_empty()
    }

    /// Total number of row operations in the plan.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.to_delete.len() + self.to_upsert.len() + self.to_create.len()
    }

    #[must_use]
    pub fn has_creates(&self) -> bool {
        !self.to_create.is_empty()
    }
}

/// Compute the delete/upsert/create plan for `submitted` against `store`.
///
/// Pure and deterministic: the same inputs always yield the same plan. The
/// caller is expected to have rejected duplicate ids; if duplicates slip
/// through, each occurrence is upserted in order and the last one wins.
#[must_use]
pub fn reconcile(store: &[Note], submitted: &[SubmittedNote]) -> ReconcilePlan {
    let submitted_ids: HashSet<i64> = submitted.iter().filter_map(|note| note.id).collect();

    let to_delete = store
        .iter()
        .map(|note| note.id)
        .filter(|id| !submitted_ids.contains(id))
        .collect();

    let mut to_upsert = Vec::with_capacity(submitted_ids.len());
    let mut to_create = Vec::new();
    for note in submitted {
        match note.as_note() {
            Some(existing) => to_upsert.push(existing),
            None => to_create.push(note.content.clone()),
        }
    }

    ReconcilePlan {
        to_delete,
        to_upsert,
        to_create,
    }
}
