//! Ordered keyed arena of list entries.

use indexmap::IndexMap;
use noteset_core::NOTES_FIELD;
use noteset_core::entities::{DraftNote, Note};
use noteset_core::fields::{FieldErrors, FieldPath};

use crate::entry::{ENTRY_LEVEL, ListEntry};
use crate::error::EditorError;
use crate::key::RenderKey;
use crate::view::{EditorView, EntryView};

/// Editable state of the `notes` list.
///
/// Position in the arena is display and submission order; the map key is the
/// entry's render key.
#[derive(Debug, Clone, Default)]
pub struct ListEditor {
    entries: IndexMap<RenderKey, ListEntry>,
    form_errors: Vec<String>,
}

impl ListEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per note, in the order given.
    #[must_use]
    pub fn seeded(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut editor = Self::new();
        editor.reseed(notes);
        editor
    }

    /// Replace every entry with fresh ones built from `notes`.
    pub fn reseed(&mut self, notes: impl IntoIterator<Item = Note>) {
        self.replace(notes.into_iter().map(ListEntry::from_note));
    }

    /// Rebuild from a rejected submission and attach its errors.
    ///
    /// Entries show exactly what the user submitted; the store is not
    /// consulted.
    pub fn restore(&mut self, drafts: impl IntoIterator<Item = DraftNote>, errors: &FieldErrors) {
        self.replace(drafts.into_iter().map(ListEntry::from_draft));
        self.apply_errors(errors);
    }

    fn replace(&mut self, entries: impl Iterator<Item = ListEntry>) {
        self.entries = entries.map(|entry| (entry.render_key, entry)).collect();
        self.form_errors.clear();
    }

    /// Add a blank entry after position `after` (at the end when `None` or
    /// out of range) and return its key.
    pub fn insert(&mut self, after: Option<usize>) -> RenderKey {
        let entry = ListEntry::blank();
        let key = entry.render_key;
        let index = after.map_or(self.entries.len(), |position| {
            position.saturating_add(1).min(self.entries.len())
        });
        self.entries.shift_insert(index, key, entry);
        key
    }

    /// Remove the entry with `key`. Other entries keep their keys and their
    /// relative order.
    pub fn remove_by_render_key(&mut self, key: RenderKey) -> Option<ListEntry> {
        self.entries.shift_remove(&key)
    }

    /// Replace the text of one entry.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownKey` if no entry has `key`.
    pub fn set_content(&mut self, key: RenderKey, content: impl Into<String>) -> Result<(), EditorError> {
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(EditorError::UnknownKey(key))?;
        entry.content = content.into();
        Ok(())
    }

    /// Attach a validation error tree to the entries.
    ///
    /// Previous errors are cleared. `notes[i].<field>` lands on the entry at
    /// position `i`; everything else, including indices past the end, is
    /// kept as a form-level error. Content is never modified.
    pub fn apply_errors(&mut self, errors: &FieldErrors) {
        self.form_errors.clear();
        for entry in self.entries.values_mut() {
            entry.errors.clear();
        }

        for (raw_path, messages) in errors.iter() {
            let target = FieldPath::parse(raw_path)
                .ok()
                .and_then(|path| {
                    path.list_entry(NOTES_FIELD)
                        .map(|(index, field)| (index, field.unwrap_or(ENTRY_LEVEL).to_string()))
                })
                .and_then(|(index, field)| {
                    self.entries
                        .get_index_mut(index)
                        .map(|(_, entry)| (entry, field))
                });

            match target {
                Some((entry, field)) => {
                    for message in messages {
                        entry.push_error(&field, message);
                    }
                }
                None => {
                    for message in messages {
                        let line = if raw_path.is_empty() {
                            message.clone()
                        } else {
                            format!("{raw_path}: {message}")
                        };
                        if !self.form_errors.contains(&line) {
                            self.form_errors.push(line);
                        }
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: RenderKey) -> Option<&ListEntry> {
        self.entries.get(&key)
    }

    #[must_use]
    pub fn position(&self, key: RenderKey) -> Option<usize> {
        self.entries.get_index_of(&key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ListEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn render_keys(&self) -> Vec<RenderKey> {
        self.entries.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.form_errors.is_empty() || self.entries.values().any(ListEntry::has_errors)
    }

    /// Form pairs for the next submission, positions renumbered from 0.
    ///
    /// Entries without a store id post an empty `id`.
    #[must_use]
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.entries.len() * 2);
        for (index, entry) in self.entries.values().enumerate() {
            let id = entry.domain_id.map(|id| id.to_string()).unwrap_or_default();
            pairs.push((format!("{NOTES_FIELD}[{index}].id"), id));
            pairs.push((format!("{NOTES_FIELD}[{index}].content"), entry.content.clone()));
        }
        pairs
    }

    /// `to_form_pairs` as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn to_form_body(&self) -> String {
        self.to_form_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    #[must_use]
    pub fn view(&self) -> EditorView {
        EditorView {
            entries: self
                .entries
                .values()
                .enumerate()
                .map(|(position, entry)| EntryView {
                    key: entry.render_key,
                    position,
                    id: entry.domain_id,
                    content: entry.content.clone(),
                    errors: entry.errors.clone(),
                })
                .collect(),
            form_errors: self.form_errors.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn notes(rows: &[(i64, &str)]) -> Vec<Note> {
        rows.iter().map(|(id, content)| Note::new(*id, *content)).collect()
    }

    fn contents(editor: &ListEditor) -> Vec<String> {
        editor.entries().map(|entry| entry.content.clone()).collect()
    }

    #[test]
    fn seeded_has_one_entry_per_note_in_order() {
        let editor = ListEditor::seeded(notes(&[(1, "a"), (2, "b"), (3, "c")]));
        assert_eq!(editor.len(), 3);
        assert_eq!(contents(&editor), vec!["a", "b", "c"]);
        let ids: Vec<_> = editor.entries().map(|entry| entry.domain_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        assert!(!editor.has_errors());
    }

    #[test]
    fn removal_keeps_every_other_key() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a"), (2, "b"), (3, "c")]));
        let keys = editor.render_keys();

        let removed = editor.remove_by_render_key(keys[1]).unwrap();
        assert_eq!(removed.domain_id, Some(2));
        assert_eq!(editor.render_keys(), vec![keys[0], keys[2]]);
        assert_eq!(editor.position(keys[2]), Some(1));
        assert!(editor.remove_by_render_key(keys[1]).is_none());
    }

    #[test]
    fn insertion_never_reuses_a_key() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a"), (2, "b")]));
        let before = editor.render_keys();
        editor.remove_by_render_key(before[0]);

        let inserted = editor.insert(None);
        assert!(!before.contains(&inserted));
        assert_eq!(editor.position(inserted), Some(1));
        assert_eq!(editor.get(inserted).unwrap().domain_id, None);
    }

    #[rstest]
    #[case(None, 3)]
    #[case(Some(0), 1)]
    #[case(Some(1), 2)]
    #[case(Some(99), 3)]
    #[case(Some(usize::MAX), 3)]
    fn insert_places_blank_after_position(#[case] after: Option<usize>, #[case] expected: usize) {
        let mut editor = ListEditor::seeded(notes(&[(1, "a"), (2, "b"), (3, "c")]));
        let key = editor.insert(after);
        assert_eq!(editor.position(key), Some(expected));
        assert_eq!(editor.len(), 4);
    }

    #[test]
    fn reseed_mints_fresh_keys() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a")]));
        let old = editor.render_keys();
        editor.reseed(notes(&[(1, "a")]));
        assert_ne!(editor.render_keys(), old);
    }

    #[test]
    fn set_content_on_unknown_key_fails() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a")]));
        let key = editor.render_keys()[0];
        editor.set_content(key, "edited").unwrap();
        assert_eq!(contents(&editor), vec!["edited"]);

        let stray = RenderKey::mint();
        assert_eq!(editor.set_content(stray, "x"), Err(EditorError::UnknownKey(stray)));
    }

    #[test]
    fn errors_attach_only_to_the_invalid_entry() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a"), (2, "b")]));
        let mut errors = FieldErrors::new();
        errors.insert_raw("notes[0].content", "Required");
        editor.apply_errors(&errors);

        let entries: Vec<_> = editor.entries().collect();
        assert_eq!(entries[0].field_errors("content"), ["Required".to_string()]);
        assert!(!entries[1].has_errors());
        assert_eq!(contents(&editor), vec!["a", "b"]);
    }

    #[test]
    fn apply_errors_clears_stale_errors() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a")]));
        let mut errors = FieldErrors::new();
        errors.insert_raw("notes[0].content", "Required");
        editor.apply_errors(&errors);
        assert!(editor.has_errors());

        editor.apply_errors(&FieldErrors::new());
        assert!(!editor.has_errors());
    }

    #[test]
    fn unmatched_errors_become_form_errors() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a")]));
        let mut errors = FieldErrors::new();
        errors.insert_raw("", "Malformed form body");
        errors.insert_raw("notes[5].id", "Required");
        errors.insert_raw("__intent__", "Unknown intent: explode");
        errors.insert_raw("notes[0]", "null is not of type \"object\"");
        editor.apply_errors(&errors);

        assert_eq!(
            editor.form_errors(),
            [
                "Malformed form body".to_string(),
                "__intent__: Unknown intent: explode".to_string(),
                "notes[5].id: Required".to_string(),
            ]
        );
        let first = editor.entries().next().unwrap();
        assert_eq!(first.field_errors(ENTRY_LEVEL).len(), 1);
    }

    #[test]
    fn restore_shows_drafts_with_errors() {
        let mut editor = ListEditor::seeded(notes(&[(1, "stored")]));
        let mut errors = FieldErrors::new();
        errors.insert_raw("notes[1].id", "Duplicate note id 1");
        editor.restore(
            vec![
                DraftNote {
                    id: Some(1),
                    content: "typed".into(),
                },
                DraftNote {
                    id: Some(1),
                    content: "again".into(),
                },
            ],
            &errors,
        );

        assert_eq!(contents(&editor), vec!["typed", "again"]);
        let entries: Vec<_> = editor.entries().collect();
        assert!(!entries[0].has_errors());
        assert_eq!(entries[1].field_errors("id"), ["Duplicate note id 1".to_string()]);
    }

    #[test]
    fn form_pairs_renumber_after_removal() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a"), (2, "b"), (3, "c")]));
        let keys = editor.render_keys();
        editor.remove_by_render_key(keys[0]);
        editor.insert(None);

        let pairs = editor.to_form_pairs();
        let expected: Vec<(String, String)> = [
            ("notes[0].id", "2"),
            ("notes[0].content", "b"),
            ("notes[1].id", "3"),
            ("notes[1].content", "c"),
            ("notes[2].id", ""),
            ("notes[2].content", ""),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn form_body_is_urlencoded() {
        let editor = ListEditor::seeded(notes(&[(7, "a b&c")]));
        assert_eq!(
            editor.to_form_body(),
            "notes%5B0%5D.id=7&notes%5B0%5D.content=a%20b%26c"
        );
    }

    #[test]
    fn view_reports_positions_and_errors() {
        let mut editor = ListEditor::seeded(notes(&[(1, "a"), (2, "")]));
        let mut errors = FieldErrors::new();
        errors.insert_raw("notes[1].content", "Content must not be empty");
        editor.apply_errors(&errors);

        let view = editor.view();
        assert!(view.has_errors());
        assert_eq!(view.entries[1].position, 1);
        assert_eq!(view.entries[1].id, Some(2));
        assert_eq!(view.entries[0].key, editor.render_keys()[0]);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["entries"][0].get("errors").is_none());
        assert_eq!(json["entries"][1]["errors"]["content"][0], "Content must not be empty");
    }
}
