//! # noteset-schema
//!
//! Schema-driven parsing of note list submissions.
//!
//! This crate provides:
//! - `FormData`: decoding of `application/x-www-form-urlencoded` bodies with
//!   path-style keys (`notes[0].content`)
//! - `SchemaRegistry`: JSON Schemas generated from noteset-core types, with
//!   validation that reports errors by field path
//! - `SubmissionValidator`: form → typed `NoteSubmission`, or a per-field error
//!   tree plus the user's drafts for redisplay
//! - `Intent`: list intents carried in the reserved `__intent__` form key
//!
//! ## Architecture
//!
//! Entity types are defined in `noteset-core` with `#[derive(JsonSchema)]`.
//! Decoding is guided by the registered schema (integer coercion, empty
//! lists), validation is delegated to `jsonschema`, and every error is mapped
//! to a `FieldPath` so the list editor can attach it to the right entry.

pub mod error;
pub mod form;
pub mod intent;
pub mod registry;
mod shapes;
pub mod validator;

pub use error::SchemaError;
pub use form::FormData;
pub use intent::Intent;
pub use registry::SchemaRegistry;
pub use validator::{InvalidSubmission, SubmissionValidator, ValidatorOptions};
