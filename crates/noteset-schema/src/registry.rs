//! Central schema registry for all Noteset types.
//!
//! The `SchemaRegistry` builds JSON Schemas from noteset-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`, either as flat messages or as a per-field error tree.

use std::collections::HashMap;

use jsonschema::error::ValidationErrorKind;
use noteset_core::fields::{FieldErrors, FieldPath, PathSegment};
use schemars::schema_for;
use serde_json::Value;

use crate::error::SchemaError;
use crate::shapes::PersistedSubmissionShape;

/// Submission schema requiring an id on every entry.
pub const SUBMISSION: &str = "note_submission";
/// Submission schema admitting id-less entries (create path).
pub const SUBMISSION_CREATE: &str = "note_submission_create";

/// Message used for missing required properties.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Central store of all JSON Schemas in the Noteset system.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a new registry containing the entity, submission, and response
    /// schemas.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        register!(schemas, "note", noteset_core::entities::Note);
        register!(schemas, SUBMISSION, PersistedSubmissionShape);
        register!(
            schemas,
            SUBMISSION_CREATE,
            noteset_core::entities::NoteSubmission
        );
        register!(schemas, "field_errors", noteset_core::fields::FieldErrors);
        register!(
            schemas,
            "reconcile_plan",
            noteset_core::reconcile::ReconcilePlan
        );
        register!(schemas, "notes_page", noteset_core::responses::NotesPage);
        register!(schemas, "apply_report", noteset_core::responses::ApplyReport);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    fn require(&self, name: &str) -> Result<&Value, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }

    /// Validate a JSON value and report every error under the path of the
    /// offending value. An empty tree means the value is valid.
    ///
    /// Missing required properties are reported at the property itself
    /// (`notes[0].content`), not at the object that lacks it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::Generation` if the schema does not compile.
    pub fn validate_fields(&self, name: &str, instance: &Value) -> Result<FieldErrors, SchemaError> {
        let schema = self.require(name)?;
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let mut errors = FieldErrors::new();
        for error in validator.iter_errors(instance) {
            let path = FieldPath::from_json_pointer(&error.instance_path.to_string());
            match &error.kind {
                ValidationErrorKind::Required { property } => {
                    let property = property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_string);
                    errors.insert(&path.key(property), REQUIRED_MESSAGE);
                }
                _ => errors.insert(&path, error.to_string()),
            }
        }
        Ok(errors)
    }

    /// Schema node describing the value at `path`, following `$ref`s into
    /// `$defs`. Returns `None` when the schema does not describe that path.
    #[must_use]
    pub fn node_at(&self, name: &str, path: &FieldPath) -> Option<&Value> {
        let root = self.get(name)?;
        let mut node = resolve(root, root);
        for segment in path.segments() {
            node = match segment {
                PathSegment::Key(key) => node.get("properties")?.get(key.as_str())?,
                PathSegment::Index(_) => node.get("items")?,
            };
            node = resolve(root, node);
        }
        Some(node)
    }

    /// Whether the schema at `path` admits the given JSON type name.
    #[must_use]
    pub fn admits_type(&self, name: &str, path: &FieldPath, type_name: &str) -> bool {
        self.node_at(name, path)
            .is_some_and(|node| schema_types(node).contains(&type_name))
    }

    /// Names of top-level properties whose schema type is `array`.
    #[must_use]
    pub fn root_array_properties(&self, name: &str) -> Vec<&str> {
        let Some(root) = self.get(name) else {
            return Vec::new();
        };
        let Some(properties) = resolve(root, root).get("properties").and_then(Value::as_object)
        else {
            return Vec::new();
        };
        let mut names: Vec<&str> = properties
            .iter()
            .filter(|(_, node)| schema_types(resolve(root, node)).contains(&"array"))
            .map(|(key, _)| key.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow a local `$ref` (`#/$defs/...`) if `node` is a reference.
fn resolve<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
    let mut current = node;
    // Bounded so a self-referencing schema cannot loop forever.
    for _ in 0..8 {
        let Some(target) = current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| reference.strip_prefix('#'))
            .and_then(|pointer| root.pointer(pointer))
        else {
            break;
        };
        current = target;
    }
    current
}

/// JSON type names declared by a schema node (`"type": "x"` or `"type": [..]`).
fn schema_types(node: &Value) -> Vec<&str> {
    match node.get("type") {
        Some(Value::String(single)) => vec![single.as_str()],
        Some(Value::Array(many)) => many.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
