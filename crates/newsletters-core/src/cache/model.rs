//! Cache data models.

use chrono::{DateTime, Utc};

use crate::newsletter::{NewsletterId, NewsletterRecord};

/// The last snapshot stored in the cache.
#[derive(Debug, Clone, Default)]
pub struct CachedSnapshot {
    /// Records in delivery order.
    pub records: Vec<NewsletterRecord>,
    /// When the snapshot was stored; `None` if the cache is empty.
    pub cached_at: Option<DateTime<Utc>>,
}

impl CachedSnapshot {
    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A cached newsletter body.
#[derive(Debug, Clone)]
pub struct CachedBody {
    /// Newsletter ID.
    pub id: NewsletterId,
    /// Full body.
    pub body: String,
    /// When the body was cached.
    pub cached_at: DateTime<Utc>,
}
