//! Email/password sign-in against the identity toolkit.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// ID token issued by a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdToken {
    /// Bearer token for document store requests.
    pub id_token: String,
    /// Token for obtaining a fresh ID token.
    pub refresh_token: String,
    /// User id of the signed-in account.
    pub local_id: String,
    /// Email of the signed-in account.
    pub email: String,
    /// Expiration time.
    pub expires_at: Option<DateTime<Utc>>,
}

impl IdToken {
    /// Builds a token from a sign-in response.
    #[must_use]
    pub fn from_response(response: SignInResponse) -> Self {
        let expires_at = expiry(response.expires_in.as_deref());

        Self {
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            local_id: response.local_id,
            email: response.email,
            expires_at,
        }
    }

    /// Applies a refresh response; the account fields are kept.
    #[must_use]
    pub fn refreshed(&self, response: RefreshResponse) -> Self {
        Self {
            id_token: response.id_token,
            refresh_token: if response.refresh_token.is_empty() {
                self.refresh_token.clone()
            } else {
                response.refresh_token
            },
            local_id: self.local_id.clone(),
            email: self.email.clone(),
            expires_at: expiry(response.expires_in.as_deref()),
        }
    }

    /// Checks if the token is expired (with 60 second buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| Utc::now() + Duration::seconds(60) >= exp)
    }
}

fn expiry(expires_in: Option<&str>) -> Option<DateTime<Utc>> {
    expires_in
        .and_then(|s| s.parse::<i64>().ok())
        .map(|secs| Utc::now() + Duration::seconds(secs))
}

/// Request body for `accounts:signInWithPassword`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Response body of `accounts:signInWithPassword`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// ID token.
    pub id_token: String,
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: String,
    /// Lifetime in seconds, as a decimal string.
    #[serde(default)]
    pub expires_in: Option<String>,
    /// User id.
    #[serde(default)]
    pub local_id: String,
    /// Account email.
    #[serde(default)]
    pub email: String,
}

/// Form body of the token refresh endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

/// Response body of the token refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    /// New ID token.
    pub id_token: String,
    /// New refresh token.
    #[serde(default)]
    pub refresh_token: String,
    /// Lifetime in seconds, as a decimal string.
    #[serde(default)]
    pub expires_in: Option<String>,
}
