use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque document identifier, assigned by the store on creation.
///
/// Stable for the document's lifetime and unique within its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned ordering token.
///
/// Monotonic per store. Clients compare these, never parse them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// For store implementations: wrap a monotonic tick.
    pub fn from_tick(tick: u64) -> Self {
        Self(tick)
    }
}

/// Dynamic field value. Catalog fields are scalar text (including
/// enumerations and years stored as strings) or small text lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    TextList(Vec<String>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn list(items: Vec<String>) -> Self {
        Value::TextList(items)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::TextList(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::TextList(items) => Some(items),
            Value::Text(_) => None,
        }
    }

    /// Empty text (after trimming) or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            Value::TextList(items) => items.is_empty(),
        }
    }
}

/// Named fields of one catalog item.
pub type FieldMap = BTreeMap<String, Value>;

/// A single catalog document as mirrored from the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: FieldMap,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Text value of a field, if present and scalar.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_text)
    }
}

/// The full ordered result set of one live query at a point in time.
///
/// Replaced wholesale on every delivery; never patched incrementally.
pub type Snapshot = Vec<Document>;
