//! Typed field values as encoded by the Firestore REST API.
//!
//! Every field travels as a single-key object naming its type, for example
//! `{"stringValue": "hello"}` or `{"timestampValue": "2025-04-03T12:00:00Z"}`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit null.
    #[serde(rename = "nullValue")]
    Null(()),
    /// Boolean.
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    /// 64-bit integer, transmitted as a decimal string.
    #[serde(rename = "integerValue")]
    Integer(String),
    /// Double-precision float.
    #[serde(rename = "doubleValue")]
    Double(f64),
    /// RFC 3339 timestamp.
    #[serde(rename = "timestampValue")]
    Timestamp(DateTime<Utc>),
    /// UTF-8 string.
    #[serde(rename = "stringValue")]
    String(String),
    /// Base64 encoded bytes.
    #[serde(rename = "bytesValue")]
    Bytes(String),
    /// Path of another document.
    #[serde(rename = "referenceValue")]
    Reference(String),
    /// Latitude/longitude pair.
    #[serde(rename = "geoPointValue")]
    GeoPoint(GeoPoint),
    /// Array of values.
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    /// Nested map.
    #[serde(rename = "mapValue")]
    Map(MapValue),
}

/// Geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: f64,
}

/// Array payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Elements; omitted by the API when empty.
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Map payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    /// Entries; omitted by the API when empty.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    /// Creates a null value.
    #[must_use]
    pub const fn null() -> Self {
        Self::Null(())
    }

    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Returns the string if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a timestamp value.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns true for an explicit null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(()))
    }

    /// Name of the value type, as used on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null(()) => "nullValue",
            Self::Boolean(_) => "booleanValue",
            Self::Integer(_) => "integerValue",
            Self::Double(_) => "doubleValue",
            Self::Timestamp(_) => "timestampValue",
            Self::String(_) => "stringValue",
            Self::Bytes(_) => "bytesValue",
            Self::Reference(_) => "referenceValue",
            Self::GeoPoint(_) => "geoPointValue",
            Self::Array(_) => "arrayValue",
            Self::Map(_) => "mapValue",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}
