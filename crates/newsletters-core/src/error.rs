//! Error types for the core library.

use thiserror::Error;

use crate::newsletter::DecodeError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Document store request failed.
    #[error("Remote store error: {0}")]
    Remote(#[from] newsletters_firestore::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A snapshot could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage error.
    #[error("Credential error: {0}")]
    Credential(#[from] crate::account::credentials::CredentialError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
