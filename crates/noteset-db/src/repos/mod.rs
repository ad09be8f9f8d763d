//! Repository methods, one module per table.

pub mod note;

pub use note::UpsertOutcome;
