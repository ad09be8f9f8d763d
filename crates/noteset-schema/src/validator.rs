//! Submission validation: form body → typed `NoteSubmission`, or a per-field
//! error tree plus the drafts the user typed.
//!
//! ```text
//! body ─ FormData::parse ─ to_value (schema-guided) ─ jsonschema ─ semantic checks ─ NoteSubmission
//!                               │                        │               │
//!                               └──── FieldErrors ◄──────┴───────────────┘ + drafts
//! ```
//!
//! Validation is pure. Nothing here reads or writes the store.

use std::collections::HashSet;

use noteset_core::NOTES_FIELD;
use noteset_core::entities::{DraftNote, NoteSubmission};
use noteset_core::enums::CreatePolicy;
use noteset_core::fields::{FieldErrors, FieldPath};
use serde_json::Value;
use thiserror::Error;

use crate::form::FormData;
use crate::intent::{INTENT_FIELD, Intent};
use crate::registry::{SUBMISSION, SUBMISSION_CREATE, SchemaRegistry};

pub const EMPTY_CONTENT: &str = "Content must not be empty";
pub const ID_OUT_OF_RANGE: &str = "Id must be a whole number in the 64-bit signed range";

/// Knobs that change what a valid submission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// With `Enabled`, entries may omit `id`.
    pub create_policy: CreatePolicy,
    /// With `false`, blank content is a field error.
    pub allow_empty_content: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            create_policy: CreatePolicy::Disabled,
            allow_empty_content: true,
        }
    }
}

/// A rejected submission: what was wrong, and what the user had typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("submission rejected with {} invalid field(s)", .errors.len())]
pub struct InvalidSubmission {
    pub errors: FieldErrors,
    pub drafts: Vec<DraftNote>,
}

impl InvalidSubmission {
    fn whole_form(message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(&FieldPath::root(), message);
        Self {
            errors,
            drafts: Vec::new(),
        }
    }
}

pub struct SubmissionValidator {
    registry: SchemaRegistry,
    options: ValidatorOptions,
}

impl SubmissionValidator {
    #[must_use]
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            options,
        }
    }

    /// Registered schema submissions are checked against.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        if self.options.create_policy.allows_create() {
            SUBMISSION_CREATE
        } else {
            SUBMISSION
        }
    }

    /// Decode and validate a urlencoded body.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubmission` if the body is not form encoding or the
    /// submission fails validation.
    pub fn validate_body(&self, body: &str) -> Result<NoteSubmission, InvalidSubmission> {
        let form = FormData::parse(body).map_err(|e| InvalidSubmission::whole_form(e.to_string()))?;
        self.validate(&form)
    }

    /// Validate a decoded form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubmission` with every field error found and the
    /// drafts read from the form.
    pub fn validate(&self, form: &FormData) -> Result<NoteSubmission, InvalidSubmission> {
        let (document, errors) = form.to_value(&self.registry, self.schema_name());
        self.check(document, errors)
    }

    /// Validate an already-structured submission (e.g. a JSON file).
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubmission` as for [`Self::validate`].
    pub fn validate_value(&self, document: Value) -> Result<NoteSubmission, InvalidSubmission> {
        self.check(document, FieldErrors::new())
    }

    /// Intent posted with the form.
    ///
    /// # Errors
    ///
    /// An unknown intent is reported at `__intent__`, with the form's drafts.
    pub fn intent(&self, form: &FormData) -> Result<Intent, InvalidSubmission> {
        Intent::from_form(form.intent()).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.insert_raw(INTENT_FIELD, e.to_string());
            InvalidSubmission {
                errors,
                drafts: self.drafts(form),
            }
        })
    }

    /// Best-effort reading of the entries in a form, valid or not.
    #[must_use]
    pub fn drafts(&self, form: &FormData) -> Vec<DraftNote> {
        let (document, _) = form.to_value(&self.registry, self.schema_name());
        drafts_from_value(&document)
    }

    fn check(&self, document: Value, mut errors: FieldErrors) -> Result<NoteSubmission, InvalidSubmission> {
        match self.registry.validate_fields(self.schema_name(), &document) {
            Ok(schema_errors) => errors.merge(schema_errors),
            Err(e) => errors.insert(&FieldPath::root(), e.to_string()),
        }

        let drafts = drafts_from_value(&document);
        errors.merge(self.semantic_errors(&document, &drafts));

        if errors.is_empty() {
            match serde_json::from_value::<NoteSubmission>(document) {
                Ok(submission) => return Ok(submission),
                Err(e) => errors.insert(&FieldPath::root(), e.to_string()),
            }
        }

        tracing::debug!(invalid_fields = errors.len(), "submission rejected");
        Err(InvalidSubmission { errors, drafts })
    }

    fn semantic_errors(&self, document: &Value, drafts: &[DraftNote]) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let list = FieldPath::root().key(NOTES_FIELD);

        let mut seen = HashSet::new();
        for (index, draft) in drafts.iter().enumerate() {
            if let Some(id) = draft.id
                && !seen.insert(id)
            {
                errors.insert(&list.clone().index(index).key("id"), format!("Duplicate note id {id}"));
            }
        }

        let entries = document.get(NOTES_FIELD).and_then(Value::as_array);
        for (index, entry) in entries.into_iter().flatten().enumerate() {
            // The schema accepts 1.0 and 2^63 as integers; i64 does not.
            if let Some(Value::Number(id)) = entry.get("id")
                && id.as_i64().is_none()
                && id.as_f64().is_some_and(|value| value.fract().abs() < f64::EPSILON)
            {
                errors.insert(&list.clone().index(index).key("id"), ID_OUT_OF_RANGE);
            }

            if !self.options.allow_empty_content
                && let Some(Value::String(content)) = entry.get("content")
                && content.trim().is_empty()
            {
                errors.insert(&list.clone().index(index).key("content"), EMPTY_CONTENT);
            }
        }
        errors
    }
}

impl Default for SubmissionValidator {
    fn default() -> Self {
        Self::new(ValidatorOptions::default())
    }
}

/// Read drafts from a decoded document. Entries keep their list positions so
/// error paths still line up; unreadable entries become blank drafts.
fn drafts_from_value(document: &Value) -> Vec<DraftNote> {
    document
        .get(NOTES_FIELD)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(draft_from_entry).collect())
        .unwrap_or_default()
}

fn draft_from_entry(entry: &Value) -> DraftNote {
    let id = entry.get("id").and_then(|id| {
        id.as_i64()
            .or_else(|| id.as_str().and_then(|raw| raw.trim().parse().ok()))
    });
    let content = match entry.get("content") {
        Some(Value::String(content)) => content.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .find_map(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };
    DraftNote { id, content }
}
