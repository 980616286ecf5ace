//! # newsletters-core
//!
//! Core logic for the `Newsletters` reader.
//!
//! This crate provides:
//! - Newsletter records and snapshot decoding
//! - Vendor classification and grouped Today / Historical views
//! - Row labels and reader dates
//! - Read-state toggling with local mirroring
//! - The shared record state fed by snapshot subscriptions
//! - Keyring-backed sign-in credentials
//! - **Offline Cache** - Last snapshot and fetched bodies in `SQLite`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod cache;
mod error;
pub mod newsletter;
pub mod read_state;
pub mod reader;
pub mod service;
pub mod state;

pub use account::credentials;
pub use account::{
    CredentialError, CredentialResult, CredentialStore, Credentials, KeyringStore,
    save_and_sign_in, sign_in_with_stored,
};
pub use cache::{CachedBody, CachedSnapshot, SnapshotCache};
pub use error::{Error, Result};
pub use newsletter::{
    Context, DecodeError, GroupedView, NewsletterGroup, NewsletterId, NewsletterRecord, RowLabel,
    build_view, classify, decode_snapshot, row_label,
};
pub use read_state::{ToggleOutcome, mark_read_on_open, toggle_read};
pub use reader::{OpenedNewsletter, ReaderBody, fetch_body, open_newsletter};
pub use service::{
    Authenticator, BodySource, Collections, Delivery, FirestoreService, MetadataSource,
    ReadStateWriter, Subscription,
};
pub use state::{NewsletterState, SharedState};
