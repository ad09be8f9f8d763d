use std::collections::BTreeMap;

use noteset_core::entities::{DraftNote, Note};

use crate::key::RenderKey;

/// Field name under which errors about the entry as a whole are kept.
pub const ENTRY_LEVEL: &str = "";

/// One editable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub render_key: RenderKey,
    /// Store id, `None` for a row that was never saved.
    pub domain_id: Option<i64>,
    pub content: String,
    /// Messages by field name (`content`, `id`, or [`ENTRY_LEVEL`]).
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ListEntry {
    #[must_use]
    pub fn blank() -> Self {
        Self::with(None, String::new())
    }

    #[must_use]
    pub fn from_note(note: Note) -> Self {
        Self::with(Some(note.id), note.content)
    }

    #[must_use]
    pub fn from_draft(draft: DraftNote) -> Self {
        Self::with(draft.id, draft.content)
    }

    fn with(domain_id: Option<i64>, content: String) -> Self {
        Self {
            render_key: RenderKey::mint(),
            domain_id,
            content,
            errors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn push_error(&mut self, field: &str, message: &str) {
        let messages = self.errors.entry(field.to_string()).or_default();
        if !messages.iter().any(|existing| existing == message) {
            messages.push(message.to_string());
        }
    }
}
