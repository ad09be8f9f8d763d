//! List intents posted alongside a form.
//!
//! A form carries at most one intent under the reserved `__intent__` key:
//!
//! ```text
//! (absent) | submit           validate and save
//! remove/<list>/<index>       drop one entry and redisplay, nothing saved
//! ```

use std::fmt;
use std::str::FromStr;

use noteset_core::NOTES_FIELD;
use noteset_core::entities::DraftNote;

use crate::error::SchemaError;

/// Reserved form key carrying the intent.
pub const INTENT_FIELD: &str = "__intent__";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Intent {
    #[default]
    Submit,
    Remove { list: String, index: usize },
}

impl Intent {
    /// Intent for removing entry `index` of the notes list.
    #[must_use]
    pub fn remove_note(index: usize) -> Self {
        Self::Remove {
            list: NOTES_FIELD.to_string(),
            index,
        }
    }

    /// Read the intent posted with a form; a missing key means submit.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidIntent` for an unrecognised value.
    pub fn from_form(raw: Option<&str>) -> Result<Self, SchemaError> {
        raw.map_or(Ok(Self::Submit), str::parse)
    }

    /// Apply a remove intent to the notes drafts. Out-of-range indices and
    /// intents aimed at other lists leave the drafts unchanged.
    #[must_use]
    pub fn apply(&self, mut drafts: Vec<DraftNote>) -> Vec<DraftNote> {
        if let Self::Remove { list, index } = self
            && list == NOTES_FIELD
            && *index < drafts.len()
        {
            drafts.remove(*index);
        }
        drafts
    }
}

impl FromStr for Intent {
    type Err = SchemaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidIntent(raw.to_string());
        match raw.split('/').collect::<Vec<_>>().as_slice() {
            [""] | ["submit"] => Ok(Self::Submit),
            ["remove", list, index] if !list.is_empty() => Ok(Self::Remove {
                list: (*list).to_string(),
                index: index.parse().map_err(|_| invalid())?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit => f.write_str("submit"),
            Self::Remove { list, index } => write!(f, "remove/{list}/{index}"),
        }
    }
}
