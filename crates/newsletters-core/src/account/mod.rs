//! Account sign-in.
//!
//! Credentials live in the system keyring. They are saved before the first
//! sign-in attempt and reused on later launches; without them no
//! subscription is started.

pub mod credentials;

pub use credentials::{
    CredentialError, CredentialResult, CredentialStore, Credentials, KeyringStore,
};

use tracing::{info, warn};

use crate::Result;
use crate::service::Authenticator;

/// Signs in with stored credentials, if there are any.
///
/// Returns the credentials used, or `None` when nothing is stored.
///
/// # Errors
///
/// Returns an error if the store cannot be read or sign-in fails.
pub async fn sign_in_with_stored<A, S>(auth: &mut A, store: &S) -> Result<Option<Credentials>>
where
    A: Authenticator,
    S: CredentialStore,
{
    let Some(credentials) = store.load()? else {
        info!("No stored credentials");
        return Ok(None);
    };

    auth.sign_in(&credentials).await?;
    info!("Signed in as {}", credentials.email);
    Ok(Some(credentials))
}

/// Saves credentials and signs in with them.
///
/// The credentials are kept even if sign-in fails, so a later launch
/// retries with the same pair.
///
/// # Errors
///
/// Returns an error if the store cannot be written or sign-in fails.
pub async fn save_and_sign_in<A, S>(auth: &mut A, store: &S, credentials: &Credentials) -> Result<()>
where
    A: Authenticator,
    S: CredentialStore,
{
    store.store(credentials)?;
    if let Err(e) = auth.sign_in(credentials).await {
        warn!("Sign-in failed for {}: {e}", credentials.email);
        return Err(e);
    }
    info!("Signed in as {}", credentials.email);
    Ok(())
}
