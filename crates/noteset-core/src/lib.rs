//! # noteset-core
//!
//! Core types and the list reconciliation engine for Noteset.
//!
//! This crate provides the foundational types shared across all Noteset crates:
//! - Entity structs for persisted notes and submitted note lists
//! - Policy and outcome enums
//! - Field paths and per-field error trees (`notes[2].content`)
//! - The pure reconciliation engine (delete/upsert plan)
//! - Response types returned by the CLI and HTTP boundary
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod fields;
pub mod reconcile;
pub mod responses;

/// Name of the list field carried by every note submission.
pub const NOTES_FIELD: &str = "notes";
