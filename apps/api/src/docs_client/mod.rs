//! Docs Client: the single point of entry for all remote document calls.
//!
//! ARCHITECTURAL RULE: exporters talk to the document service only through the
//! `DocumentService` trait. The Google implementation lives here; tests swap in an
//! in-memory fake.
//!
//! No call is retried. A partially applied export is left as-is.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;

pub mod auth;
pub mod types;

pub use types::{BatchUpdateResponse, Document, Request};

use auth::{AuthError, TokenProvider};

use types::{BatchUpdateRequest, CreatedFile};

pub const DEFAULT_DOCS_API_BASE: &str = "https://docs.googleapis.com/v1";
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const GOOGLE_DOC_MIME_TYPE: &str = "application/vnd.google-apps.document";

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response missing {0}")]
    MissingReply(&'static str),
}

/// Remote rich-document service. Element positions are assigned server side and
/// are only observable through `get_document`.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Creates an empty document and returns its id.
    async fn create_document(&self, name: &str) -> Result<String, DocsError>;

    /// Applies `requests` atomically, in order.
    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError>;

    /// Fetches the live structural tree.
    async fn get_document(&self, document_id: &str) -> Result<Document, DocsError>;
}

pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/edit")
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// Endpoint roots; overridable for staging or a local stub server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub docs_api_base: String,
    pub drive_api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            docs_api_base: DEFAULT_DOCS_API_BASE.to_string(),
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
        }
    }
}

/// Google Docs/Drive client bound to one access token.
#[derive(Clone)]
pub struct GoogleDocsClient {
    client: Client,
    endpoints: Endpoints,
    access_token: String,
}

/// Shared HTTP client for all Google calls.
pub fn build_http_client(timeout: Duration) -> Result<Client, DocsError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

impl GoogleDocsClient {
    pub fn new(client: Client, endpoints: Endpoints, access_token: String) -> Self {
        Self {
            client,
            endpoints,
            access_token,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DocsError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GoogleError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(DocsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DocumentService for GoogleDocsClient {
    async fn create_document(&self, name: &str) -> Result<String, DocsError> {
        let response = self
            .client
            .post(format!("{}/files", self.endpoints.drive_api_base))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "name": name,
                "mimeType": GOOGLE_DOC_MIME_TYPE,
            }))
            .send()
            .await?;

        let created: CreatedFile = Self::read_json(response).await?;
        debug!("Created document {} ({name})", created.id);
        Ok(created.id)
    }

    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError> {
        debug!("batchUpdate {document_id}: {} requests", requests.len());
        let response = self
            .client
            .post(format!(
                "{}/documents/{document_id}:batchUpdate",
                self.endpoints.docs_api_base
            ))
            .bearer_auth(&self.access_token)
            .json(&BatchUpdateRequest { requests })
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, DocsError> {
        let response = self
            .client
            .get(format!(
                "{}/documents/{document_id}",
                self.endpoints.docs_api_base
            ))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

/// Hands out an authenticated `DocumentService` per export. Authentication happens
/// here, before any export work starts.
#[async_trait]
pub trait DocsConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn DocumentService>, AuthError>;
}

pub struct GoogleConnector {
    client: Client,
    endpoints: Endpoints,
    tokens: TokenProvider,
}

impl GoogleConnector {
    pub fn new(client: Client, endpoints: Endpoints, tokens: TokenProvider) -> Self {
        Self {
            client,
            endpoints,
            tokens,
        }
    }
}

#[async_trait]
impl DocsConnector for GoogleConnector {
    async fn connect(&self) -> Result<Arc<dyn DocumentService>, AuthError> {
        let access_token = self.tokens.access_token().await?;
        Ok(Arc::new(GoogleDocsClient::new(
            self.client.clone(),
            self.endpoints.clone(),
            access_token,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        assert_eq!(
            document_url("abc123"),
            "https://docs.google.com/document/d/abc123/edit"
        );
    }

    #[test]
    fn test_google_error_body_parses() {
        let body = r#"{"error": {"code": 400, "message": "Invalid requests[3]", "status": "INVALID_ARGUMENT"}}"#;
        let parsed: GoogleError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Invalid requests[3]");
    }

    #[test]
    fn test_batch_update_body_shape() {
        let requests = vec![Request::page_break()];
        let body = serde_json::to_value(BatchUpdateRequest { requests: &requests }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "requests": [ { "insertPageBreak": { "endOfSegmentLocation": { "segmentId": "" } } } ] })
        );
    }

    #[tokio::test]
    async fn test_connector_without_credentials_is_unauthorized() {
        let tokens =
            TokenProvider::new(Client::new(), auth::DEFAULT_TOKEN_URL.to_string(), None, None);
        let connector = GoogleConnector::new(Client::new(), Endpoints::default(), tokens);
        assert!(matches!(
            connector.connect().await,
            Err(AuthError::InteractiveUnavailable)
        ));
    }
}
