//! Entity structs for Noteset domain objects.
//!
//! `Note` maps to the `notes` table. The submission types describe one
//! validated form post. All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip and schema validation.

mod note;
mod submission;

pub use note::Note;
pub use submission::{DraftNote, NoteSubmission, SubmittedNote};
