//! Blog payloads and the rules applied to them before they reach the store.
//!
//! Documents stay opaque `serde_json::Value`s. Only `title`, `content` and
//! `author` are inspected, plus the two timestamps the proxy writes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Fields a client may set on create and update.
pub const EDITABLE_FIELDS: [&str; 3] = ["title", "content", "author"];

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// A create payload lacked at least one required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("All fields are required (title, content, author)")]
pub struct MissingFields;

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T10:20:30.123Z`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether a field counts as supplied.
///
/// Absent, `null`, `false`, zero and the empty string are all treated as
/// missing. Arrays and objects always count, even when empty.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A create payload that passed the presence check.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    title: Value,
    content: Value,
    author: Value,
}

impl NewBlog {
    /// Pick the required fields out of a request body.
    ///
    /// Values are kept as given; only presence is checked.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, MissingFields> {
        let field = |name: &str| {
            let value = body.get(name);
            if is_present(value) {
                value.cloned().ok_or(MissingFields)
            } else {
                Err(MissingFields)
            }
        };

        Ok(Self {
            title: field("title")?,
            content: field("content")?,
            author: field("author")?,
        })
    }

    /// The document sent to the store. Both timestamps share one instant.
    pub fn into_document(self, now: DateTime<Utc>) -> Value {
        let stamp = timestamp(now);
        json!({
            "title": self.title,
            "content": self.content,
            "author": self.author,
            CREATED_AT: stamp,
            UPDATED_AT: stamp,
        })
    }
}

/// The editable fields an update request actually supplied.
///
/// A key that is present overwrites, whatever its value (`null` included).
/// A key that is absent leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    fields: Map<String, Value>,
}

impl BlogPatch {
    pub fn from_body(body: &Map<String, Value>) -> Self {
        let fields = EDITABLE_FIELDS
            .iter()
            .filter_map(|name| body.get(*name).map(|v| (name.to_string(), v.clone())))
            .collect();
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merge the patch over an existing document and refresh `updatedAt`.
    ///
    /// Every other key of the existing document, `id` and `createdAt`
    /// included, is carried over untouched. A non-object document is
    /// replaced by an empty one before merging.
    pub fn apply(&self, existing: Value, now: DateTime<Utc>) -> Value {
        let mut document = match existing {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for (name, value) in &self.fields {
            document.insert(name.clone(), value.clone());
        }
        document.insert(UPDATED_AT.to_string(), Value::String(timestamp(now)));

        Value::Object(document)
    }
}
