//! Field paths and per-field error trees.
//!
//! A `FieldPath` addresses one value inside a submitted form, written the way
//! form keys are written: `notes[2].content`. The validator produces
//! `FieldErrors` keyed by these paths; the list editor maps them back onto
//! entries. Neither side needs to know about the other.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One step of a `FieldPath`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a submission (`notes[2].content`).
///
/// The empty path addresses the submission itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parse a form-style path such as `notes[2].content`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPath` for empty keys, unclosed brackets, or
    /// non-numeric indices.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut path = Self::root();
        if raw.is_empty() {
            return Ok(path);
        }

        let mut chars = raw.chars().peekable();
        let mut key = String::new();
        let mut expect_key = true;

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if expect_key {
                        if key.is_empty() {
                            return Err(invalid("empty key"));
                        }
                        path.segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    expect_key = true;
                }
                '[' => {
                    if expect_key {
                        if key.is_empty() {
                            return Err(invalid("index without a key"));
                        }
                        path.segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) if d.is_ascii_digit() => digits.push(d),
                            Some(_) => return Err(invalid("index must be a non-negative integer")),
                            None => return Err(invalid("unclosed '['")),
                        }
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| invalid("index must be a non-negative integer"))?;
                    path.segments.push(PathSegment::Index(index));
                    expect_key = false;
                    if let Some(next) = chars.peek()
                        && !matches!(next, '.' | '[')
                    {
                        return Err(invalid("expected '.' or '[' after ']'"));
                    }
                }
                ']' => return Err(invalid("unexpected ']'")),
                other => {
                    if !expect_key {
                        return Err(invalid("expected '.' or '[' after ']'"));
                    }
                    key.push(other);
                }
            }
        }

        if expect_key {
            if key.is_empty() {
                return Err(invalid("empty key"));
            }
            path.segments.push(PathSegment::Key(key));
        }
        Ok(path)
    }

    /// Convert a JSON pointer (`/notes/2/content`) into a field path.
    ///
    /// All-digit segments are read as list indices.
    #[must_use]
    pub fn from_json_pointer(pointer: &str) -> Self {
        let mut path = Self::root();
        for raw in pointer.split('/').skip(1) {
            let segment = raw.replace("~1", "/").replace("~0", "~");
            match segment.parse::<usize>() {
                Ok(index) if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) => {
                    path.segments.push(PathSegment::Index(index));
                }
                _ => path.segments.push(PathSegment::Key(segment)),
            }
        }
        path
    }

    /// If this path points into entry `i` of list `list`, return `i` and the
    /// field name below it (`None` when the path addresses the entry itself).
    #[must_use]
    pub fn list_entry(&self, list: &str) -> Option<(usize, Option<&str>)> {
        match self.segments.as_slice() {
            [PathSegment::Key(name), PathSegment::Index(index)] if name == list => {
                Some((*index, None))
            }
            [PathSegment::Key(name), PathSegment::Index(index), PathSegment::Key(field), ..]
                if name == list =>
            {
                Some((*index, Some(field.as_str())))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Per-field error messages for one rejected submission.
///
/// Keys are rendered field paths (`notes[0].content`); the empty key holds
/// errors about the submission as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &FieldPath, message: impl Into<String>) {
        self.insert_raw(path.to_string(), message);
    }

    /// Record an error under a path that may not parse (e.g. a malformed form key).
    pub fn insert_raw(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let messages = self.0.entry(path.into()).or_default();
        let message = message.into();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct paths carrying errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }

    pub fn merge(&mut self, other: Self) {
        for (path, messages) in other.0 {
            for message in messages {
                self.insert_raw(path.clone(), message);
            }
        }
    }
}
