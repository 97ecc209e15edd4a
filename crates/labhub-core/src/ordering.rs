use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::document::{Document, Value};

/// Sort key for a live query.
///
/// `created_at` and `updated_at` address document metadata; any other name
/// addresses a payload field compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }

    /// Total order over documents: the sort field, then the creation token,
    /// then the id, so equal keys still order deterministically.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let primary = match self.field.as_str() {
            "created_at" => a.created_at.cmp(&b.created_at),
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            name => field_text(a, name).cmp(field_text(b, name)),
        };
        let primary = if self.ascending {
            primary
        } else {
            primary.reverse()
        };
        primary
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, docs: &mut [Document]) {
        docs.sort_by(|a, b| self.compare(a, b));
    }
}

fn field_text<'a>(doc: &'a Document, name: &str) -> &'a str {
    doc.fields.get(name).and_then(Value::as_text).unwrap_or("")
}
