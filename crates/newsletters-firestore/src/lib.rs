//! # newsletters-firestore
//!
//! Minimal REST client for the Firestore document store.
//!
//! ## Features
//!
//! - **Sign-in**: email/password sign-in through the identity toolkit,
//!   with ID token refresh
//! - **Documents**: list a collection (all pages), fetch one document
//! - **Updates**: write a single field of an existing document
//! - **Values**: typed representation of the REST field encoding
//!
//! ## Quick Start
//!
//! ```ignore
//! use newsletters_firestore::{FirestoreClient, FirestoreConfig, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = FirestoreClient::new(FirestoreConfig::new("project", "api-key"));
//!     client.sign_in_with_password("reader@example.com", "secret").await?;
//!
//!     let docs = client.list_documents("NewsletterMetadata").await?;
//!     println!("{} documents", docs.len());
//!
//!     client
//!         .update_field("NewsletterMetadata", docs[0].id(), "isRead", &Value::from(true))
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
mod client;
pub mod document;
mod error;
pub mod value;

pub use auth::IdToken;
pub use client::{
    DEFAULT_AUTH_BASE, DEFAULT_FIRESTORE_BASE, DEFAULT_TOKEN_BASE, FirestoreClient,
    FirestoreConfig,
};
pub use document::{Document, ListDocumentsResponse};
pub use error::{Error, ErrorBody, ErrorResponse, Result};
pub use value::Value;
