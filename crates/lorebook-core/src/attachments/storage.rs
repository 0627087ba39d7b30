//! Storage-delete collaborator
//!
//! The reclaimer only ever asks storage for one thing: delete the object at a
//! URL. [`HttpStorageClient`] does that against a delete-by-URL endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::StorageConfig;

/// Why a single deletion failed
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist; callers treat this as already deleted
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage rejected credentials ({0})")]
    Unauthorized(StatusCode),
    #[error("storage returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("storage request failed: {0}")]
    Network(String),
    #[error("storage client misconfigured: {0}")]
    Config(String),
}

impl StorageError {
    /// Deleting something that is already gone counts as success
    pub fn is_already_deleted(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Network(e.to_string())
    }
}

/// Deletes stored objects by URL
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn delete_object(&self, url: &str) -> Result<(), StorageError>;
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    url: &'a str,
}

/// Storage client speaking to an HTTP delete-by-URL endpoint
///
/// Sends `DELETE <endpoint>` with a JSON body `{"url": ...}` and a bearer
/// token when one is configured.
pub struct HttpStorageClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpStorageClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token,
        }
    }

    /// Build a client with the configured endpoint, credential and timeout
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let endpoint = config
            .delete_endpoint
            .clone()
            .ok_or_else(|| StorageError::Config("no delete_endpoint configured".to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lorebook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, endpoint, config.token.clone()))
    }
}

#[async_trait]
impl StorageClient for HttpStorageClient {
    async fn delete_object(&self, url: &str) -> Result<(), StorageError> {
        debug!(url = %url, endpoint = %self.endpoint, "Storage: deleting object");

        let mut request = self
            .client
            .delete(&self.endpoint)
            .json(&DeleteRequest { url });

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, url, body))
    }
}

/// Map a non-success status to a storage error
fn classify_failure(status: StatusCode, url: &str, body: String) -> StorageError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => StorageError::NotFound(url.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized(status),
        _ => StorageError::Status { status, body },
    }
}
