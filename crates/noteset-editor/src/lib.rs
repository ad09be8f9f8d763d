//! # noteset-editor
//!
//! Client-side state of the editable note list.
//!
//! Each entry carries a `RenderKey` minted when the entry comes into being
//! and never reused, independent of the note's store id. Removing or
//! inserting entries never changes the key of any other entry, so whatever a
//! renderer keeps per key (focus, caret, scroll) stays with the right row.
//!
//! The editor never talks to the store. It is seeded from store rows,
//! restored from a rejected submission's drafts, and produces the form
//! payload the next submission posts.

pub mod editor;
pub mod entry;
pub mod error;
pub mod key;
pub mod view;

pub use editor::ListEditor;
pub use entry::ListEntry;
pub use error::EditorError;
pub use key::RenderKey;
pub use view::{EditorView, EntryView};
