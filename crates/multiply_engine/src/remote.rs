use multiply_core::CanonicalState;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::SyncSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("invalid store url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("could not encode state: {0}")]
    Encode(String),
}

/// Writes the full canonical state to the durable store.
///
/// Callers treat this as fire-and-forget; errors are only ever logged.
#[async_trait::async_trait]
pub trait RemoteSync: Send + Sync {
    async fn persist(&self, state: &CanonicalState) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRemoteSync {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl ReqwestRemoteSync {
    pub fn new(settings: &SyncSettings) -> Result<Self, RemoteError> {
        let url = reqwest::Url::parse(&settings.api_url)
            .map_err(|err| RemoteError::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RemoteError::Network(err.to_string()))?;
        Ok(Self { client, url })
    }

    /// Reads the store's current record as raw JSON text.
    pub async fn fetch_snapshot(&self) -> Result<String, RemoteError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::HttpStatus(status.as_u16()));
        }
        response.text().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl RemoteSync for ReqwestRemoteSync {
    async fn persist(&self, state: &CanonicalState) -> Result<(), RemoteError> {
        let body = serde_json::to_vec(state).map_err(|err| RemoteError::Encode(err.to_string()))?;
        let response = self
            .client
            .put(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::Timeout(err.to_string());
    }
    RemoteError::Network(err.to_string())
}
