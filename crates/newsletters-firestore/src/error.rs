//! Error types for document store operations.

/// Result type alias for document store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Document store error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The REST API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status text.
        message: String,
    },

    /// A request needing an ID token was made before signing in.
    #[error("Not signed in")]
    NotSignedIn,

    /// Password sign-in was rejected.
    #[error("Sign-in failed: {0}")]
    Auth(String),
}

impl Error {
    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Returns true if the error is an HTTP 404 from the API.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Error body returned by Google REST endpoints.
///
/// Both the document store and the identity toolkit wrap errors as
/// `{"error": {"code": 400, "message": "...", "status": "..."}}`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorResponse {
    /// Inner error object.
    pub error: ErrorBody,
}

/// Inner error object of an [`ErrorResponse`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    #[serde(default)]
    pub code: u16,
    /// Human-readable message (for sign-in, a code like `INVALID_PASSWORD`).
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.code, 404);
        assert_eq!(parsed.error.message, "Document not found");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::api(404, "missing").is_not_found());
        assert!(!Error::api(403, "denied").is_not_found());
        assert!(!Error::NotSignedIn.is_not_found());
    }
}
