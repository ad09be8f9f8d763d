//! Schema-only shapes for the canonical submission.
//!
//! `NoteSubmission` admits id-less entries for the create path. When creates
//! are disabled the validator checks against these shapes instead, which
//! require `id` on every entry. Nothing is ever deserialized into them.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Deserialize, JsonSchema)]
#[serde(rename = "SubmittedNote")]
#[allow(dead_code)]
pub(crate) struct PersistedNoteShape {
    pub id: i64,
    pub content: String,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename = "NoteSubmission")]
#[allow(dead_code)]
pub(crate) struct PersistedSubmissionShape {
    pub notes: Vec<PersistedNoteShape>,
}
