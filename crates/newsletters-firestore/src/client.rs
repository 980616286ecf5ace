//! HTTP client for the document store REST API.

use std::collections::BTreeMap;

use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;
use url::Url;

use crate::auth::{IdToken, RefreshRequest, RefreshResponse, SignInRequest, SignInResponse};
use crate::document::{Document, FieldsPatch, ListDocumentsResponse};
use crate::error::{Error, ErrorResponse, Result};
use crate::value::Value;

/// Default REST endpoint of the document store.
pub const DEFAULT_FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Default REST endpoint of the identity toolkit.
pub const DEFAULT_AUTH_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Default REST endpoint of the token service.
pub const DEFAULT_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";

/// Page size used when listing a collection.
const PAGE_SIZE: u32 = 300;

/// Project and endpoint configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Cloud project id.
    pub project_id: String,
    /// Web API key (used for sign-in).
    pub api_key: String,
    /// Database id.
    pub database: String,
    /// Document store base URL (overridable for the local emulator).
    pub firestore_base: String,
    /// Identity toolkit base URL.
    pub auth_base: String,
    /// Token service base URL.
    pub token_base: String,
}

impl FirestoreConfig {
    /// Creates a configuration for the default database of a project.
    #[must_use]
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
            database: "(default)".to_string(),
            firestore_base: DEFAULT_FIRESTORE_BASE.to_string(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            token_base: DEFAULT_TOKEN_BASE.to_string(),
        }
    }

    /// Points both endpoints at a different host, e.g. an emulator.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        firestore_base: impl Into<String>,
        auth_base: impl Into<String>,
    ) -> Self {
        self.firestore_base = firestore_base.into();
        self.auth_base = auth_base.into();
        self
    }

    /// URL of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn collection_url(&self, collection: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/projects/{}/databases/{}/documents/{collection}",
            self.firestore_base.trim_end_matches('/'),
            self.project_id,
            self.database,
        ))?)
    }

    /// URL of a single document. The id is escaped as one path segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn document_url(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    /// URL of the password sign-in endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn sign_in_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/accounts:signInWithPassword",
            self.auth_base.trim_end_matches('/')
        ))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// URL of the token refresh endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn refresh_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/token", self.token_base.trim_end_matches('/')))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Document store client.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    config: FirestoreConfig,
    http_client: Client,
    token: Option<IdToken>,
}

impl FirestoreClient {
    /// Creates a client that is not signed in yet.
    #[must_use]
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
            token: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// Returns the current ID token, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&IdToken> {
        self.token.as_ref()
    }

    /// Installs a previously obtained ID token.
    pub fn set_token(&mut self, token: IdToken) {
        self.token = Some(token);
    }

    /// Signs in with email and password and keeps the returned token.
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` if the credentials are rejected, or an HTTP
    /// error if the endpoint cannot be reached.
    pub async fn sign_in_with_password(&mut self, email: &str, password: &str) -> Result<IdToken> {
        let body = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http_client
            .post(self.config.sign_in_url()?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ErrorResponse>().await {
                Ok(error) => error.error.message,
                Err(_) => status.to_string(),
            };
            return Err(Error::Auth(message));
        }

        let token = IdToken::from_response(response.json::<SignInResponse>().await?);
        debug!("Signed in as {}", token.email);
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Exchanges the refresh token for a new ID token.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotSignedIn` without a token, `Error::Auth` if the
    /// refresh is rejected.
    pub async fn refresh_id_token(&mut self) -> Result<IdToken> {
        let current = self.token.as_ref().ok_or(Error::NotSignedIn)?;
        let body = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token: &current.refresh_token,
        };

        let response = self
            .http_client
            .post(self.config.refresh_url()?)
            .form(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ErrorResponse>().await {
                Ok(error) => error.error.message,
                Err(_) => status.to_string(),
            };
            return Err(Error::Auth(message));
        }

        let token = current.refreshed(response.json::<RefreshResponse>().await?);
        debug!("Refreshed ID token for {}", token.email);
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Refreshes the ID token if it is about to expire.
    ///
    /// # Errors
    ///
    /// Returns an error if a needed refresh fails.
    pub async fn ensure_fresh_token(&mut self) -> Result<()> {
        if self.token.as_ref().is_some_and(IdToken::is_expired) {
            self.refresh_id_token().await?;
        }
        Ok(())
    }

    /// Lists every document of a collection, following page tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.config.collection_url(collection)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &PAGE_SIZE.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.authorized(self.http_client.get(url))?.send().await?;
            let page: ListDocumentsResponse = check(response).await?.json().await?;
            documents.extend(page.documents);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} documents from {collection}", documents.len());
        Ok(documents)
    }

    /// Fetches a single document; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than 404.
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.config.document_url(collection, id)?;
        let response = self.authorized(self.http_client.get(url))?.send().await?;

        match check(response).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes a single field of an existing document.
    ///
    /// Other fields are left untouched. Fails if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &Value,
    ) -> Result<Document> {
        let mut url = self.config.document_url(collection, id)?;
        url.query_pairs_mut()
            .append_pair("updateMask.fieldPaths", field)
            .append_pair("currentDocument.exists", "true");

        let mut fields = BTreeMap::new();
        fields.insert(field, value);

        let response = self
            .authorized(self.http_client.patch(url))?
            .json(&FieldsPatch { fields })
            .send()
            .await?;

        let document = check(response).await?.json().await?;
        debug!("Updated {field} on {collection}/{id}");
        Ok(document)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token.as_ref().ok_or(Error::NotSignedIn)?;
        Ok(request.bearer_auth(&token.id_token))
    }
}

/// Turns a non-success response into `Error::Api`.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(error) if !error.error.message.is_empty() => error.error.message,
        _ => status.to_string(),
    };
    Err(Error::api(status.as_u16(), message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn config() -> FirestoreConfig {
        FirestoreConfig::new("newsletters-app", "api-key")
    }

    #[test]
    fn test_collection_url() {
        let url = assert_ok!(config().collection_url("NewsletterMetadata"));
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/newsletters-app/databases/(default)/documents/NewsletterMetadata"
        );
    }

    #[test]
    fn test_document_url() {
        let url = assert_ok!(config().document_url("NewsletterData", "abc123"));
        assert!(url.as_str().ends_with("/documents/NewsletterData/abc123"));
    }

    #[test]
    fn test_document_url_escapes_id() {
        let url = assert_ok!(config().document_url("NewsletterMetadata", "a/b"));
        assert!(url.as_str().ends_with("/documents/NewsletterMetadata/a%2Fb"));
    }

    #[test]
    fn test_sign_in_url_carries_key() {
        let url = config().sign_in_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=api-key"
        );
    }

    #[test]
    fn test_emulator_endpoints() {
        let config = config().with_endpoints(
            "http://localhost:8080/v1/",
            "http://localhost:9099/identitytoolkit.googleapis.com/v1",
        );
        let url = config.collection_url("C").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/projects/newsletters-app/databases/(default)/documents/C"
        );
    }

    #[test]
    fn test_refresh_url_carries_key() {
        let url = config().refresh_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://securetoken.googleapis.com/v1/token?key=api-key"
        );
    }

    #[tokio::test]
    async fn test_refresh_requires_token() {
        let mut client = FirestoreClient::new(config());
        assert_ok!(client.ensure_fresh_token().await);
        assert!(matches!(
            client.refresh_id_token().await.unwrap_err(),
            Error::NotSignedIn
        ));
    }

    #[tokio::test]
    async fn test_requests_require_token() {
        let client = FirestoreClient::new(config());
        assert!(client.token().is_none());

        let err = client.list_documents("C").await.unwrap_err();
        assert!(matches!(err, Error::NotSignedIn));

        let err = client.get_document("C", "id").await.unwrap_err();
        assert!(matches!(err, Error::NotSignedIn));
    }
}
