use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Note;

/// One entry of a validated submission.
///
/// `id` is `None` only for an entry that was never persisted, which the
/// validator admits only when the create path is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubmittedNote {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
}

impl SubmittedNote {
    #[must_use]
    pub fn existing(id: i64, content: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn draft(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
        }
    }

    /// The persisted form of this entry, if it carries an id.
    #[must_use]
    pub fn as_note(&self) -> Option<Note> {
        self.id.map(|id| Note::new(id, self.content.clone()))
    }
}

impl From<Note> for SubmittedNote {
    fn from(note: Note) -> Self {
        Self {
            id: Some(note.id),
            content: note.content,
        }
    }
}

/// Typed value of one form post, entries in submission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NoteSubmission {
    pub notes: Vec<SubmittedNote>,
}

impl NoteSubmission {
    #[must_use]
    pub const fn new(notes: Vec<SubmittedNote>) -> Self {
        Self { notes }
    }

    /// Ids carried by the submission, in submission order.
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.notes.iter().filter_map(|note| note.id)
    }
}

/// Best-effort reading of one entry of a rejected submission.
///
/// Drafts keep whatever the user typed so a failed submission can be shown
/// again without falling back to stored state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DraftNote {
    pub id: Option<i64>,
    pub content: String,
}

impl From<SubmittedNote> for DraftNote {
    fn from(note: SubmittedNote) -> Self {
        Self {
            id: note.id,
            content: note.content,
        }
    }
}

impl From<Note> for DraftNote {
    fn from(note: Note) -> Self {
        Self {
            id: Some(note.id),
            content: note.content,
        }
    }
}
