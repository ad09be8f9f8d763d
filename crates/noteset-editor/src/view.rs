use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::key::RenderKey;

/// Serializable snapshot of the editor, as sent to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorView {
    pub entries: Vec<EntryView>,
    /// Errors not tied to any one entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_errors: Vec<String>,
}

impl EditorView {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.form_errors.is_empty() || self.entries.iter().any(|entry| !entry.errors.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub key: RenderKey,
    pub position: usize,
    pub id: Option<i64>,
    pub content: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}
