//! Secure credential storage using system keyring.
//!
//! The sign-in email and password are kept in the platform's native
//! credential store:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use keyring::Entry;
use tracing::{debug, warn};

/// Service name used for keyring entries.
pub const SERVICE_NAME: &str = "newsletters";

/// Entry holding the sign-in email.
pub const EMAIL_KEY: &str = "userEmail";

/// Entry holding the sign-in password.
pub const PASSWORD_KEY: &str = "userPassword";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Email and password used to sign in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Storage for the credential pair.
pub trait CredentialStore {
    /// Saves both entries, replacing any previous values.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn store(&self, credentials: &Credentials) -> CredentialResult<()>;

    /// Loads the pair; `None` unless both entries exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn load(&self) -> CredentialResult<Option<Credentials>>;

    /// Deletes both entries. Missing entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn delete(&self) -> CredentialResult<()>;
}

/// [`CredentialStore`] backed by the system keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl CredentialStore for KeyringStore {
    fn store(&self, credentials: &Credentials) -> CredentialResult<()> {
        store_credentials(credentials)
    }

    fn load(&self) -> CredentialResult<Option<Credentials>> {
        load_credentials()
    }

    fn delete(&self) -> CredentialResult<()> {
        delete_credentials()
    }
}

fn get_entry(key: &str) -> CredentialResult<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, key)?;
    match entry.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => {
            debug!("No keyring entry for {key}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn delete_entry(key: &str) -> CredentialResult<()> {
    let entry = Entry::new(SERVICE_NAME, key)?;
    match entry.delete_credential() {
        Ok(()) => debug!("Deleted keyring entry {key}"),
        Err(keyring::Error::NoEntry) => debug!("No keyring entry {key} to delete"),
        Err(e) => {
            warn!("Failed to delete keyring entry {key}: {e}");
            return Err(e.into());
        }
    }
    Ok(())
}

/// Stores email and password in the system keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn store_credentials(credentials: &Credentials) -> CredentialResult<()> {
    Entry::new(SERVICE_NAME, EMAIL_KEY)?.set_password(&credentials.email)?;
    Entry::new(SERVICE_NAME, PASSWORD_KEY)?.set_password(&credentials.password)?;
    debug!("Stored credentials for {}", credentials.email);
    Ok(())
}

/// Loads email and password from the system keyring.
///
/// Returns `None` unless both entries are present.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn load_credentials() -> CredentialResult<Option<Credentials>> {
    let email = get_entry(EMAIL_KEY)?;
    let password = get_entry(PASSWORD_KEY)?;
    Ok(email
        .zip(password)
        .map(|(email, password)| Credentials { email, password }))
}

/// Deletes both credential entries from the keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails (except for missing entries).
pub fn delete_credentials() -> CredentialResult<()> {
    delete_entry(EMAIL_KEY)?;
    delete_entry(PASSWORD_KEY)
}
