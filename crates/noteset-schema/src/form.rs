//! `application/x-www-form-urlencoded` decoding with path-style keys.
//!
//! Form keys address values inside a nested document (`notes[1].content`).
//! Decoding into a `serde_json::Value` is guided by a registered schema:
//!
//! - values at integer paths are parsed as integers; an empty value there
//!   means "absent" and unparsable text is left as a string so validation
//!   reports it at that path
//! - gaps in list indices are filled with `null`
//! - top-level list properties with no keys at all decode to `[]`
//! - a key repeated verbatim collects its values into an array
//!
//! Keys starting with `__` are reserved for control values such as the list
//! intent and never enter the document.

use noteset_core::fields::{FieldErrors, FieldPath, PathSegment};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::intent::INTENT_FIELD;
use crate::registry::SchemaRegistry;

const RESERVED_PREFIX: &str = "__";

pub const MALFORMED_KEY: &str = "Malformed field name";
pub const CONFLICTING_KEY: &str = "Field name conflicts with another field";
pub const INDEX_OUT_OF_RANGE: &str = "List index out of range";

/// Largest list index a form key may carry.
pub const MAX_LIST_INDEX: usize = 4096;

/// Decoded form body: key/value pairs in the order they were posted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Decode a urlencoded body. `+` is read as a space.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MalformedForm` if a percent escape does not
    /// decode to UTF-8.
    pub fn parse(body: &str) -> Result<Self, SchemaError> {
        let mut pairs = Vec::new();
        for part in body.split('&').filter(|part| !part.is_empty()) {
            let (raw_key, raw_value) = part.split_once('=').unwrap_or((part, ""));
            pairs.push((decode_component(raw_key)?, decode_component(raw_value)?));
        }
        Ok(Self { pairs })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// First value posted under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Raw value of the reserved intent key, if posted.
    #[must_use]
    pub fn intent(&self) -> Option<&str> {
        self.get(INTENT_FIELD)
    }

    /// Re-encode the pairs as a urlencoded body.
    #[must_use]
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build the nested document described by the form keys, guided by
    /// schema `schema` in `registry`.
    ///
    /// Keys that do not parse, or that collide with a differently-shaped
    /// key, are reported under the raw key and skipped.
    #[must_use]
    pub fn to_value(&self, registry: &SchemaRegistry, schema: &str) -> (Value, FieldErrors) {
        let mut document = Value::Object(Map::new());
        let mut errors = FieldErrors::new();

        for (key, raw) in &self.pairs {
            if key.starts_with(RESERVED_PREFIX) {
                continue;
            }
            let path = match FieldPath::parse(key) {
                Ok(path) if !path.is_root() => path,
                _ => {
                    errors.insert_raw(key.as_str(), MALFORMED_KEY);
                    continue;
                }
            };
            if path
                .segments()
                .iter()
                .any(|segment| matches!(segment, PathSegment::Index(index) if *index > MAX_LIST_INDEX))
            {
                errors.insert_raw(key.as_str(), INDEX_OUT_OF_RANGE);
                continue;
            }

            let value = if registry.admits_type(schema, &path, "integer") {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    continue;
                }
                trimmed
                    .parse::<i64>()
                    .map_or_else(|_| Value::String(raw.clone()), Value::from)
            } else {
                Value::String(raw.clone())
            };

            if insert_at(&mut document, path.segments(), value).is_err() {
                errors.insert_raw(key.as_str(), CONFLICTING_KEY);
            }
        }

        if let Value::Object(map) = &mut document {
            for list in registry.root_array_properties(schema) {
                map.entry(list.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
            }
        }

        (document, errors)
    }
}

fn decode_component(raw: &str) -> Result<String, SchemaError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| SchemaError::MalformedForm(format!("{raw}: {e}")))
}

/// Place `value` at `segments` below `slot`, creating containers on the way.
fn insert_at(slot: &mut Value, segments: &[PathSegment], value: Value) -> Result<(), ()> {
    let Some((head, rest)) = segments.split_first() else {
        return match slot {
            Value::Null => {
                *slot = value;
                Ok(())
            }
            Value::Array(items) => {
                items.push(value);
                Ok(())
            }
            Value::Object(_) => Err(()),
            scalar => {
                let previous = scalar.take();
                *scalar = Value::Array(vec![previous, value]);
                Ok(())
            }
        };
    };

    match head {
        PathSegment::Key(key) => {
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                return Err(());
            };
            insert_at(map.entry(key.clone()).or_insert(Value::Null), rest, value)
        }
        PathSegment::Index(index) => {
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            let Value::Array(items) = slot else {
                return Err(());
            };
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            insert_at(&mut items[*index], rest, value)
        }
    }
}
