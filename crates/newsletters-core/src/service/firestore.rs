//! Document store implementation of the collaborators.

use std::time::Duration;

use newsletters_firestore::{Document, FirestoreClient, Value};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{Authenticator, BodySource, Delivery, MetadataSource, ReadStateWriter, Subscription};
use crate::Result;
use crate::account::Credentials;
use crate::newsletter::{NewsletterId, fields};

/// Field of a data document holding the full body.
const BODY_FIELD: &str = "body";

/// Deliveries buffered before the poller waits for the consumer.
const DELIVERY_BUFFER: usize = 4;

/// Collection names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    /// Collection of metadata documents.
    pub metadata: String,
    /// Collection of body documents, keyed by the same IDs.
    pub data: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            metadata: "NewsletterMetadata".to_string(),
            data: "NewsletterData".to_string(),
        }
    }
}

/// Newsletter collaborators backed by the document store.
#[derive(Debug, Clone)]
pub struct FirestoreService {
    client: FirestoreClient,
    collections: Collections,
    poll_interval: Duration,
}

impl FirestoreService {
    /// Creates a service with default collections and a 30 second poll.
    #[must_use]
    pub fn new(client: FirestoreClient) -> Self {
        Self {
            client,
            collections: Collections::default(),
            poll_interval: Duration::from_secs(30),
        }
    }

    /// Sets the collection names.
    #[must_use]
    pub fn with_collections(mut self, collections: Collections) -> Self {
        self.collections = collections;
        self
    }

    /// Sets how often the metadata collection is polled.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &FirestoreClient {
        &self.client
    }

    /// Fetches the current metadata documents once.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    pub async fn fetch_snapshot(&self) -> Result<Vec<Document>> {
        Ok(self.client.list_documents(&self.collections.metadata).await?)
    }
}

impl Authenticator for FirestoreService {
    async fn sign_in(&mut self, credentials: &Credentials) -> Result<()> {
        self.client
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await?;
        info!("Signed in successfully");
        Ok(())
    }
}

impl MetadataSource for FirestoreService {
    /// Polls the metadata collection.
    ///
    /// The first snapshot is delivered immediately; later ones only when the
    /// document set changed. Must be called from within a Tokio runtime.
    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(DELIVERY_BUFFER);
        let mut client = self.client.clone();
        let collection = self.collections.metadata.clone();
        let period = self.poll_interval;

        info!("Setting up metadata snapshot listener on {collection}");
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last: Option<Vec<Document>> = None;

            loop {
                interval.tick().await;
                let listing = match client.ensure_fresh_token().await {
                    Ok(()) => client.list_documents(&collection).await,
                    Err(e) => Err(e),
                };
                let delivery: Delivery = match listing {
                    Ok(documents) => {
                        if last.as_ref() == Some(&documents) {
                            continue;
                        }
                        debug!("Number of documents returned: {}", documents.len());
                        last = Some(documents.clone());
                        Ok(documents)
                    }
                    Err(e) => {
                        warn!("Error fetching metadata: {e}");
                        Err(e.into())
                    }
                };

                if tx.send(delivery).await.is_err() {
                    debug!("Snapshot listener on {collection} stopped");
                    break;
                }
            }
        });

        Subscription::new(rx, task)
    }
}

impl BodySource for FirestoreService {
    async fn fetch_body(&self, id: &NewsletterId) -> Result<Option<String>> {
        let document = self
            .client
            .get_document(&self.collections.data, id.as_str())
            .await?;
        Ok(document
            .as_ref()
            .and_then(|d| d.field(BODY_FIELD))
            .and_then(Value::as_str)
            .map(ToString::to_string))
    }
}

impl ReadStateWriter for FirestoreService {
    async fn update_is_read(&self, id: &NewsletterId, value: bool) -> Result<()> {
        self.client
            .update_field(
                &self.collections.metadata,
                id.as_str(),
                fields::IS_READ,
                &Value::from(value),
            )
            .await?;
        Ok(())
    }
}
