use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A persisted note. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Note {
    pub id: i64,
    pub content: String,
}

impl Note {
    #[must_use]
    pub fn new(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}
