//! Documents and collection listings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name,
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`.
    pub name: String,
    /// Field values keyed by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// Creation time, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    /// Last update time, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates an empty document with the given resource name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            create_time: None,
            update_time: None,
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Document id (last segment of the resource name).
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Looks up a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// One page of a collection listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    /// Documents on this page (absent when the collection is empty).
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Token for the next page, if any.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of a field update request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FieldsPatch<'a> {
    pub fields: BTreeMap<&'a str, &'a Value>,
}
