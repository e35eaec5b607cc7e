//! Typed reads on top of [`IngestionApi`]
//!
//! List endpoints are strict: any failure aborts. Per-record lookups are
//! lenient: an HTTP error status is logged and the record is skipped.

use crate::client::IngestionApi;
use crate::error::IngestError;
use crate::models::{Connector, Destination, ListPage, SchemaConfig};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn decode<T: DeserializeOwned>(path: &str, data: Value) -> Result<T, IngestError> {
    serde_json::from_value(data).map_err(|e| IngestError::InvalidResponse {
        url: path.to_string(),
        message: e.to_string(),
    })
}

async fn get_lenient(api: &dyn IngestionApi, path: &str) -> Result<Option<Value>, IngestError> {
    match api.get(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.is_http_status() => {
            tracing::warn!("Skipping {}: {}", path, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// All connectors of the account
pub async fn list_connectors(api: &dyn IngestionApi) -> Result<Vec<Connector>, IngestError> {
    let page: ListPage<Connector> = decode("connectors", api.get("connectors").await?)?;
    Ok(page.items)
}

/// All destinations of the account
pub async fn list_destinations(api: &dyn IngestionApi) -> Result<Vec<Destination>, IngestError> {
    let page: ListPage<Destination> = decode("destinations", api.get("destinations").await?)?;
    Ok(page.items)
}

pub async fn fetch_connector(api: &dyn IngestionApi, id: &str) -> Result<Option<Connector>, IngestError> {
    let path = format!("connectors/{id}");
    get_lenient(api, &path)
        .await?
        .map(|data| decode(&path, data))
        .transpose()
}

/// Raw schema config of a connector
pub async fn fetch_connector_schema(api: &dyn IngestionApi, id: &str) -> Result<Option<Value>, IngestError> {
    get_lenient(api, &format!("connectors/{id}/schemas")).await
}

/// Sync state of a connector
pub async fn fetch_connector_state(api: &dyn IngestionApi, id: &str) -> Result<Option<Value>, IngestError> {
    get_lenient(api, &format!("connectors/{id}/state")).await
}

pub async fn fetch_destination(api: &dyn IngestionApi, id: &str) -> Result<Option<Destination>, IngestError> {
    let path = format!("destinations/{id}");
    get_lenient(api, &path)
        .await?
        .map(|data| decode(&path, data))
        .transpose()
}

/// Schema config of a connector decoded for listing
pub async fn fetch_schema_config(api: &dyn IngestionApi, id: &str) -> Result<Option<SchemaConfig>, IngestError> {
    let path = format!("connectors/{id}/schemas");
    fetch_connector_schema(api, id)
        .await?
        .map(|data| decode(&path, data))
        .transpose()
}

/// Id of the connector whose schema name is `name`
pub async fn find_connector_id(api: &dyn IngestionApi, name: &str) -> Result<Option<String>, IngestError> {
    Ok(list_connectors(api)
        .await?
        .into_iter()
        .find(|connector| connector.schema == name)
        .map(|connector| connector.id))
}

/// Accept either a connector id or a connector schema name
pub async fn resolve_connector_id(api: &dyn IngestionApi, name_or_id: &str) -> Result<String, IngestError> {
    let connectors = list_connectors(api).await?;

    if let Some(connector) = connectors.iter().find(|c| c.schema == name_or_id) {
        return Ok(connector.id.clone());
    }
    if connectors.iter().any(|c| c.id == name_or_id) {
        return Ok(name_or_id.to_string());
    }

    Err(IngestError::ConnectorNotFound(name_or_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpIngestionClient;
    use crate::mock::MockIngestionApi;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api() -> MockIngestionApi {
        let api = MockIngestionApi::new();
        api.respond(
            "connectors",
            json!({"items": [
                {"id": "c1", "schema": "salesforce", "service": "salesforce", "group_id": "g1"},
                {"id": "c2", "schema": "hubspot", "service": "hubspot", "group_id": "g1"}
            ]}),
        )
        .await;
        api
    }

    #[tokio::test]
    async fn connector_lookup_by_name() {
        let api = api().await;
        assert_eq!(find_connector_id(&api, "hubspot").await.unwrap().as_deref(), Some("c2"));
        assert_eq!(find_connector_id(&api, "stripe").await.unwrap(), None);
    }

    #[tokio::test]
    async fn resolve_name_or_id() {
        let api = api().await;
        assert_eq!(resolve_connector_id(&api, "salesforce").await.unwrap(), "c1");
        assert_eq!(resolve_connector_id(&api, "c2").await.unwrap(), "c2");
        assert!(matches!(
            resolve_connector_id(&api, "nope").await,
            Err(IngestError::ConnectorNotFound(_))
        ));
    }

    #[tokio::test]
    async fn detail_failure_is_skipped() {
        let api = api().await;
        api.fail("connectors/c1", 500).await;

        assert_eq!(fetch_connector(&api, "c1").await.unwrap(), None);
        assert_eq!(fetch_connector_state(&api, "c9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_failure_is_fatal() {
        let api = MockIngestionApi::new();
        api.fail("destinations", 401).await;

        assert!(matches!(
            list_destinations(&api).await,
            Err(IngestError::Http { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn destination_detail_is_decoded() {
        let api = MockIngestionApi::new();
        api.respond(
            "destinations/d1",
            json!({"id": "d1", "group_id": "g1", "region": "AWS_EU", "service": "databricks",
                   "config": {"catalog": "raw_eu", "port": 443}}),
        )
        .await;

        let destination = fetch_destination(&api, "d1").await.unwrap().unwrap();
        assert_eq!(destination.catalog(), "raw_eu");
        assert_eq!(destination.config.extra["port"], json!(443));
    }

    #[tokio::test]
    async fn transport_error_on_detail_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/connectors/c1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "c1"}}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = HttpIngestionClient::new(format!("{}/v1", server.uri()), None, 1).unwrap();
        match fetch_connector(&client, "c1").await {
            Err(IngestError::Request(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_detail_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/connectors/c1/state"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = HttpIngestionClient::new(format!("{}/v1", server.uri()), None, 30).unwrap();
        assert!(matches!(
            fetch_connector_state(&client, "c1").await,
            Err(IngestError::InvalidResponse { .. })
        ));
    }
}
