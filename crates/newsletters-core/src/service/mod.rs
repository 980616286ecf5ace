//! Collaborators at the boundary of the core.
//!
//! The core never talks to the network directly. It consumes snapshots from
//! a [`MetadataSource`], reads bodies through a [`BodySource`] and writes
//! read flags through a [`ReadStateWriter`]. [`FirestoreService`] implements
//! all of them against the document store.

mod firestore;
mod subscription;

use std::future::Future;

pub use firestore::{Collections, FirestoreService};
pub use subscription::{Delivery, Subscription};

use crate::Result;
use crate::account::Credentials;
use crate::newsletter::NewsletterId;

/// Signs a user in to the backend.
pub trait Authenticator {
    /// Signs in with email and password.
    fn sign_in(&mut self, credentials: &Credentials) -> impl Future<Output = Result<()>> + Send;
}

/// Live source of metadata snapshots.
pub trait MetadataSource {
    /// Starts delivering snapshots.
    ///
    /// Every delivery carries the complete current collection.
    fn subscribe(&self) -> Subscription;
}

/// On-demand source of newsletter bodies.
pub trait BodySource {
    /// Fetches the body of one newsletter; `None` if there is none.
    fn fetch_body(&self, id: &NewsletterId) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Remote writer for the read flag.
pub trait ReadStateWriter {
    /// Writes exactly the `isRead` field of one record.
    fn update_is_read(&self, id: &NewsletterId, value: bool) -> impl Future<Output = Result<()>> + Send;
}
