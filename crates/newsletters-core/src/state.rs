//! The working record collection.
//!
//! One `NewsletterState` backs every view. It has exactly two writers:
//! snapshot deliveries replace the whole collection, and a successful
//! read-state toggle patches one record found by ID.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use newsletters_firestore::Document;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::newsletter::{
    Context, DecodeError, GroupedView, NewsletterId, NewsletterRecord, build_view, decode_snapshot,
};

/// State shared between the subscription consumer and toggles.
pub type SharedState = Arc<RwLock<NewsletterState>>;

/// The current record collection.
#[derive(Debug, Clone, Default)]
pub struct NewsletterState {
    records: Vec<NewsletterRecord>,
    generation: u64,
}

impl NewsletterState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a new empty state for sharing.
    #[must_use]
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Current records, in delivery order.
    #[must_use]
    pub fn records(&self) -> &[NewsletterRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no snapshot has been applied or it was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of snapshots applied so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Looks up a record by ID.
    #[must_use]
    pub fn get(&self, id: &NewsletterId) -> Option<&NewsletterRecord> {
        self.records.iter().find(|r| r.id.as_ref() == Some(id))
    }

    /// Replaces the whole collection.
    pub fn replace(&mut self, records: Vec<NewsletterRecord>) {
        self.records = records;
        self.generation += 1;
        debug!(
            "Applied snapshot #{} with {} records",
            self.generation,
            self.records.len()
        );
    }

    /// Decodes and applies a snapshot delivery.
    ///
    /// If any document fails to decode the delivery is discarded and the
    /// previous collection stays in place.
    ///
    /// # Errors
    ///
    /// Returns the decode error of the first malformed document.
    pub fn apply_snapshot(&mut self, documents: &[Document]) -> Result<usize, DecodeError> {
        match decode_snapshot(documents) {
            Ok(records) => {
                let count = records.len();
                self.replace(records);
                info!("Fetched {count} newsletters");
                Ok(count)
            }
            Err(e) => {
                warn!("Error decoding documents, snapshot discarded: {e}");
                Err(e)
            }
        }
    }

    /// Mirrors an acknowledged read-state write. Returns false if no record
    /// with that ID is present any more.
    pub(crate) fn set_read(&mut self, id: &NewsletterId, is_read: bool) -> bool {
        match self.records.iter_mut().find(|r| r.id.as_ref() == Some(id)) {
            Some(record) => {
                record.is_read = Some(is_read);
                true
            }
            None => false,
        }
    }

    /// Builds the grouped view for a context.
    #[must_use]
    pub fn view<Tz: TimeZone>(&self, context: Context, now: &DateTime<Tz>) -> GroupedView {
        build_view(&self.records, context, now)
    }
}
