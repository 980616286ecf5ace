//! Newsletter record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a newsletter by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsletterId(pub String);

impl NewsletterId {
    /// Create a new newsletter ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NewsletterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NewsletterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NewsletterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Metadata of a received newsletter.
///
/// Records are created by the remote store. The client only ever changes
/// `is_read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterRecord {
    /// Store-assigned ID (None before the first successful fetch).
    pub id: Option<NewsletterId>,
    /// Raw sender, e.g. `Morning Brew <crew@morningbrew.com>`.
    pub sender: String,
    /// Raw subject line.
    pub subject: String,
    /// When the newsletter was received.
    pub newsletter_date: DateTime<Utc>,
    /// Full body; only filled in on demand.
    pub content: Option<String>,
    /// Read flag; absent means unread.
    pub is_read: Option<bool>,
}

impl NewsletterRecord {
    /// Creates an unread record without an ID.
    #[must_use]
    pub fn new(
        sender: impl Into<String>,
        subject: impl Into<String>,
        newsletter_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            sender: sender.into(),
            subject: subject.into(),
            newsletter_date,
            content: None,
            is_read: None,
        }
    }

    /// Sets the ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<NewsletterId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the read flag.
    #[must_use]
    pub const fn with_read(mut self, is_read: bool) -> Self {
        self.is_read = Some(is_read);
        self
    }

    /// Sender display name, derived from `sender`.
    #[must_use]
    pub fn vendor_name(&self) -> &str {
        vendor_name(&self.sender)
    }

    /// Read flag with absent treated as unread.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.is_read.unwrap_or(false)
    }
}

/// Derives the vendor name from a raw sender.
///
/// Everything before the first `<`, trimmed. A sender without `<` is
/// returned unchanged.
#[must_use]
pub fn vendor_name(sender: &str) -> &str {
    sender
        .find('<')
        .map_or(sender, |idx| sender[..idx].trim())
}
