//! HTTP client for the ingestion REST API

use crate::error::IngestError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Read access to the ingestion API
///
/// `get` returns the `data` member of the response envelope.
#[async_trait::async_trait]
pub trait IngestionApi: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, IngestError>;
}

fn has_cursor(value: &Value) -> bool {
    match value.get("next_cursor") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Unwrap `{"data": ...}`, rejecting paginated responses
pub fn unwrap_envelope(url: &str, mut body: Value) -> Result<Value, IngestError> {
    if has_cursor(&body) {
        return Err(IngestError::PaginationNotImplemented(url.to_string()));
    }

    let data = body
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| IngestError::MissingData(url.to_string()))?;

    if has_cursor(&data) {
        return Err(IngestError::PaginationNotImplemented(url.to_string()));
    }
    Ok(data)
}

/// Basic-auth client for `https://api.<service>/v1`
#[derive(Debug, Clone)]
pub struct HttpIngestionClient {
    base_url: String,
    credentials: Option<String>,
    client: Client,
}

impl HttpIngestionClient {
    /// Create a client; `credentials` is the base64 encoded `key:secret` pair
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    /// Create a client reading credentials from an environment variable
    ///
    /// A missing variable is not an error here; the API rejects the request.
    pub fn from_env(base_url: impl Into<String>, env_var: &str, timeout_secs: u64) -> Result<Self, IngestError> {
        let credentials = std::env::var(env_var).ok();
        if credentials.is_none() {
            tracing::warn!("{} is not set, requests will be unauthenticated", env_var);
        }
        Self::new(base_url, credentials, timeout_secs)
    }

    /// Base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl IngestionApi for HttpIngestionClient {
    async fn get(&self, path: &str) -> Result<Value, IngestError> {
        let url = self.url(path);
        tracing::info!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(credentials) = &self.credentials {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Basic {credentials}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("GET {} failed with status {}", url, status.as_u16());
            return Err(IngestError::Http {
                status: status.as_u16(),
                url,
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| IngestError::InvalidResponse {
                url: url.clone(),
                message: e.to_string(),
            })?;

        unwrap_envelope(&url, body)
    }
}
