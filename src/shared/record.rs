/**
 * Record Data Structure
 *
 * A record is a flat mapping of attribute name to JSON value. One attribute is
 * designated as the identity attribute (`id` unless the collection says
 * otherwise, e.g. `_id`).
 *
 * # Identity Keys
 *
 * Identities arrive from two directions: as JSON values stored on records and
 * as percent-decoded URL segments. Both are compared through their key form:
 * strings as-is, numbers by their decimal rendering. `"102"` in a URL matches
 * a record whose identity is the number `102`.
 *
 * # Reserved Attributes
 *
 * Attributes whose name starts with `_`, plus the identity attribute, are
 * reserved. Create and update responses echo only these.
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::error::SharedError;

/// Identity attribute used when a collection does not override it
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// A single record in a collection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an attribute map
    pub fn from_map(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Build a record from a JSON value
    ///
    /// # Errors
    ///
    /// Returns `SharedError::ValidationError` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, SharedError> {
        match value {
            Value::Object(attributes) => Ok(Self { attributes }),
            other => Err(SharedError::validation(
                "attributes",
                format!("record attributes must be a JSON object, got {}", json_type(&other)),
            )),
        }
    }

    /// Get an attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Builder-style `set`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    /// Copy every attribute of `changes` onto this record
    pub fn merge(&mut self, changes: &Map<String, Value>) {
        for (key, value) in changes {
            self.attributes.insert(key.clone(), value.clone());
        }
    }

    /// Take the attribute map
    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// All attributes
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// The identity value, if the record carries one
    pub fn identity(&self, id_attribute: &str) -> Option<&Value> {
        self.attributes.get(id_attribute)
    }

    /// The identity in key form
    pub fn identity_key(&self, id_attribute: &str) -> Option<String> {
        self.identity(id_attribute).and_then(identity_key)
    }

    /// Whether this record's identity matches a key (e.g. a decoded URL segment)
    pub fn has_identity(&self, id_attribute: &str, key: &str) -> bool {
        self.identity_key(id_attribute).as_deref() == Some(key)
    }

    /// Reserved attributes: names starting with `_`, plus the identity attribute
    pub fn reserved(&self, id_attribute: &str) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|(key, _)| key.starts_with('_') || key.as_str() == id_attribute)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Serialize to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.attributes)
    }
}

/// Key form of an identity value
///
/// Strings map to themselves and numbers to their decimal rendering. Any other
/// JSON type cannot act as an identity.
pub fn identity_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Identity key of a serialized record (a JSON object)
pub fn value_identity_key(value: &Value, id_attribute: &str) -> Option<String> {
    value.get(id_attribute).and_then(identity_key)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
