//! Read-state toggle.

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::newsletter::{NewsletterId, NewsletterRecord};
use crate::service::ReadStateWriter;
use crate::state::NewsletterState;

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The record has no ID; nothing was sent or changed.
    Skipped,
    /// The remote write succeeded.
    Updated {
        /// Record ID.
        id: NewsletterId,
        /// Value written.
        is_read: bool,
        /// Whether the record was still present locally to mirror the value.
        mirrored: bool,
    },
    /// The remote write failed; local state is unchanged.
    Failed {
        /// Record ID.
        id: NewsletterId,
        /// Error description.
        error: String,
    },
}

impl ToggleOutcome {
    /// Returns true if the remote write succeeded.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Flips the read flag of `record`.
///
/// The new value is the negation of the flag in the given snapshot, not of
/// the latest remote value. Callers should pass the most recently observed
/// record. The local copy is updated only after the remote write succeeds,
/// and is found by ID since the collection may have been replaced while the
/// write was in flight. Failures are logged and returned, never retried.
pub async fn toggle_read<W: ReadStateWriter>(
    writer: &W,
    state: &RwLock<NewsletterState>,
    record: &NewsletterRecord,
) -> ToggleOutcome {
    let Some(id) = record.id.clone().filter(|id| !id.as_str().is_empty()) else {
        return ToggleOutcome::Skipped;
    };
    let new_value = !record.is_read();

    match writer.update_is_read(&id, new_value).await {
        Ok(()) => {
            let mirrored = state.write().await.set_read(&id, new_value);
            info!("isRead updated to {new_value} for {id}");
            ToggleOutcome::Updated {
                id,
                is_read: new_value,
                mirrored,
            }
        }
        Err(e) => {
            warn!("Failed to update isRead for {id}: {e}");
            ToggleOutcome::Failed {
                id,
                error: e.to_string(),
            }
        }
    }
}

/// Marks `record` read if it is not already; used when a newsletter is
/// opened. Returns `None` when nothing needed doing.
pub async fn mark_read_on_open<W: ReadStateWriter>(
    writer: &W,
    state: &RwLock<NewsletterState>,
    record: &NewsletterRecord,
) -> Option<ToggleOutcome> {
    if record.is_read == Some(true) {
        return None;
    }
    Some(toggle_read(writer, state, record).await)
}
