//! In-memory ingestion API for testing

use crate::client::IngestionApi;
use crate::error::IngestError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum MockResponse {
    Data(Value),
    Status(u16),
}

/// Canned responses keyed by request path
///
/// Unknown paths answer with HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct MockIngestionApi {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockIngestionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `data` (the already unwrapped envelope)
    pub async fn respond(&self, path: &str, data: Value) {
        let mut responses = self.responses.write().await;
        responses.insert(path.to_string(), MockResponse::Data(data));
    }

    /// Answer `path` with an HTTP error status
    pub async fn fail(&self, path: &str, status: u16) {
        let mut responses = self.responses.write().await;
        responses.insert(path.to_string(), MockResponse::Status(status));
    }

    /// Paths requested so far, in order
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait::async_trait]
impl IngestionApi for MockIngestionApi {
    async fn get(&self, path: &str) -> Result<Value, IngestError> {
        self.requests.write().await.push(path.to_string());

        let responses = self.responses.read().await;
        match responses.get(path) {
            Some(MockResponse::Data(data)) => Ok(data.clone()),
            Some(MockResponse::Status(status)) => Err(IngestError::Http {
                status: *status,
                url: path.to_string(),
                message: "mock failure".to_string(),
            }),
            None => Err(IngestError::Http {
                status: 404,
                url: path.to_string(),
                message: "not found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn canned_and_missing_paths() {
        let api = MockIngestionApi::new();
        api.respond("connectors", json!({"items": []})).await;
        api.fail("destinations", 500).await;

        assert_eq!(api.get("connectors").await.unwrap(), json!({"items": []}));
        assert!(matches!(
            api.get("destinations").await,
            Err(IngestError::Http { status: 500, .. })
        ));
        assert!(matches!(
            api.get("connectors/x").await,
            Err(IngestError::Http { status: 404, .. })
        ));
        assert_eq!(
            api.requests().await,
            vec!["connectors", "destinations", "connectors/x"]
        );
    }
}
