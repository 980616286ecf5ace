//! Decoding store documents into records.

use newsletters_firestore::{Document, Value};

use super::model::{NewsletterId, NewsletterRecord};

/// Field names of a metadata document.
pub mod fields {
    /// Raw sender.
    pub const SENDER: &str = "sender";
    /// Subject line.
    pub const SUBJECT: &str = "subject";
    /// Receipt timestamp.
    pub const NEWSLETTER_DATE: &str = "newsletterDate";
    /// Optional body.
    pub const CONTENT: &str = "content";
    /// Optional read flag.
    pub const IS_READ: &str = "isRead";
}

/// A document that does not have the shape of a newsletter record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A required field is absent.
    #[error("document {document}: missing field `{field}`")]
    MissingField {
        /// Document id.
        document: String,
        /// Field name.
        field: &'static str,
    },

    /// A field has the wrong value type.
    #[error("document {document}: field `{field}` expected {expected}, found {found}")]
    WrongType {
        /// Document id.
        document: String,
        /// Field name.
        field: &'static str,
        /// Expected value type.
        expected: &'static str,
        /// Actual value type.
        found: &'static str,
    },
}

impl TryFrom<&Document> for NewsletterRecord {
    type Error = DecodeError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        let sender = required(doc, fields::SENDER, "stringValue", Value::as_str)?;
        let subject = required(doc, fields::SUBJECT, "stringValue", Value::as_str)?;
        let newsletter_date =
            required(doc, fields::NEWSLETTER_DATE, "timestampValue", Value::as_timestamp)?;
        let content = optional(doc, fields::CONTENT, "stringValue", Value::as_str)?;
        let is_read = optional(doc, fields::IS_READ, "booleanValue", Value::as_bool)?;

        let id = doc.id();
        Ok(Self {
            id: (!id.is_empty()).then(|| NewsletterId::new(id)),
            sender: sender.to_string(),
            subject: subject.to_string(),
            newsletter_date,
            content: content.map(ToString::to_string),
            is_read,
        })
    }
}

/// Decodes a whole snapshot.
///
/// All or nothing: the first document that fails to decode rejects the
/// entire snapshot.
///
/// # Errors
///
/// Returns the decode error of the first malformed document.
pub fn decode_snapshot(documents: &[Document]) -> Result<Vec<NewsletterRecord>, DecodeError> {
    documents.iter().map(NewsletterRecord::try_from).collect()
}

fn required<'a, T>(
    doc: &'a Document,
    field: &'static str,
    expected: &'static str,
    get: impl Fn(&'a Value) -> Option<T>,
) -> Result<T, DecodeError> {
    optional(doc, field, expected, get)?.ok_or_else(|| DecodeError::MissingField {
        document: doc.id().to_string(),
        field,
    })
}

/// Absent and explicit null both decode to `None`.
fn optional<'a, T>(
    doc: &'a Document,
    field: &'static str,
    expected: &'static str,
    get: impl Fn(&'a Value) -> Option<T>,
) -> Result<Option<T>, DecodeError> {
    match doc.field(field) {
        None => Ok(None),
        Some(value) if value.is_null() => Ok(None),
        Some(value) => get(value).map(Some).ok_or_else(|| DecodeError::WrongType {
            document: doc.id().to_string(),
            field,
            expected,
            found: value.kind(),
        }),
    }
}
