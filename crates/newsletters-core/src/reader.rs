//! Opening a newsletter: mark it read, then load its body.

use tokio::sync::RwLock;
use tracing::warn;

use crate::newsletter::NewsletterRecord;
use crate::read_state::{ToggleOutcome, mark_read_on_open};
use crate::service::{BodySource, ReadStateWriter};
use crate::state::NewsletterState;

/// Body of an opened newsletter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderBody {
    /// The full body.
    Loaded(String),
    /// The store has no body for this newsletter.
    NotFound,
    /// The record has no ID to look the body up by.
    MissingId,
    /// The fetch failed.
    Failed(String),
}

impl ReaderBody {
    /// Text to show in place of the body.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Loaded(body) => body.clone(),
            Self::NotFound => "No content available.".to_string(),
            Self::MissingId => "No newsletter ID provided.".to_string(),
            Self::Failed(error) => format!("Error loading content: {error}"),
        }
    }

    /// Returns the body if it was loaded.
    #[must_use]
    pub fn as_loaded(&self) -> Option<&str> {
        match self {
            Self::Loaded(body) => Some(body),
            _ => None,
        }
    }
}

/// Result of opening a newsletter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedNewsletter {
    /// The record as it was opened.
    pub record: NewsletterRecord,
    /// Read toggle performed on open, if the record was unread.
    pub toggle: Option<ToggleOutcome>,
    /// Loaded body.
    pub body: ReaderBody,
}

/// Fetches the body of a record.
pub async fn fetch_body<B: BodySource>(source: &B, record: &NewsletterRecord) -> ReaderBody {
    let Some(id) = record.id.as_ref().filter(|id| !id.as_str().is_empty()) else {
        return ReaderBody::MissingId;
    };

    match source.fetch_body(id).await {
        Ok(Some(body)) => ReaderBody::Loaded(body),
        Ok(None) => ReaderBody::NotFound,
        Err(e) => {
            warn!("Error loading content for {id}: {e}");
            ReaderBody::Failed(e.to_string())
        }
    }
}

/// Opens a newsletter: an unread record is toggled to read first, then the
/// body is fetched.
pub async fn open_newsletter<S>(
    service: &S,
    state: &RwLock<NewsletterState>,
    record: &NewsletterRecord,
) -> OpenedNewsletter
where
    S: BodySource + ReadStateWriter,
{
    let toggle = mark_read_on_open(service, state, record).await;
    let body = fetch_body(service, record).await;
    OpenedNewsletter {
        record: record.clone(),
        toggle,
        body,
    }
}
