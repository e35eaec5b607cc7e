//! End-to-end dumps against a mock HTTP server

use flowbench_ingest::{dump, dump_raw, dump_state, HttpIngestionClient, IngestError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, route: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{route}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Success",
            "data": data
        })))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{route}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn account() -> MockServer {
    let server = MockServer::start().await;

    let salesforce = json!({"id": "c1", "schema": "salesforce", "service": "salesforce", "group_id": "g1"});
    let hubspot = json!({"id": "c2", "schema": "hubspot", "service": "hubspot", "group_id": "g1"});

    mount(&server, "connectors", json!({"items": [salesforce, hubspot]})).await;
    mount(&server, "connectors/c1", json!({"id": "c1", "schema": "salesforce", "service": "salesforce", "group_id": "g1", "paused": false})).await;
    mount(&server, "connectors/c2", json!({"id": "c2", "schema": "hubspot", "service": "hubspot", "group_id": "g1"})).await;
    mount(
        &server,
        "connectors/c1/schemas",
        json!({"schemas": {
            "sf": {"enabled": true, "tables": {
                "Account": {"enabled": true, "columns": {"Id": {"enabled": true}, "Fax": {"enabled": false}}},
                "History": {"enabled": false}
            }}
        }}),
    )
    .await;
    mount_status(&server, "connectors/c2/schemas", 404).await;
    mount(&server, "connectors/c1/state", json!({"setup_state": "connected"})).await;
    mount_status(&server, "connectors/c2/state", 500).await;

    mount(&server, "destinations", json!({"items": [{"id": "d1"}]})).await;
    mount(
        &server,
        "destinations/d1",
        json!({"id": "d1", "group_id": "g1", "region": "AWS_EU", "service": "databricks", "config": {"catalog": "raw_eu"}}),
    )
    .await;

    server
}

fn client(server: &MockServer) -> HttpIngestionClient {
    HttpIngestionClient::new(format!("{}/v1", server.uri()), Some("a2V5OnNlY3JldA==".to_string()), 30)
        .unwrap()
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn dump_writes_all_and_enabled_trees() {
    let server = account().await;
    let out = tempfile::tempdir().unwrap();

    let summary = dump(&client(&server), out.path()).await.unwrap();
    assert_eq!(summary.written.len(), 3);

    let name = "connector-salesforce-salesforce-raw_eu-c1-from-list.json";
    let all = read_json(&out.path().join("all").join(name));
    assert_eq!(all["paused"], json!(false));
    assert_eq!(all["destinations"][0]["id"], json!("d1"));
    assert_eq!(all["schemas"]["schemas"]["sf"]["tables"]["History"]["enabled"], json!(false));

    let enabled = read_json(&out.path().join("enabled").join(name));
    let tables = &enabled["schemas"]["schemas"]["sf"]["tables"];
    assert!(tables.get("History").is_none());
    assert!(tables["Account"]["columns"].get("Fax").is_none());

    // No schema tree, so only the unfiltered record exists
    let hubspot = "connector-hubspot-hubspot-raw_eu-c2-from-list.json";
    assert_eq!(read_json(&out.path().join("all").join(hubspot))["schemas"], Value::Null);
    assert!(!out.path().join("enabled").join(hubspot).exists());
}

#[tokio::test]
async fn dump_raw_writes_responses() {
    let server = account().await;
    let out = tempfile::tempdir().unwrap();

    let summary = dump_raw(&client(&server), out.path()).await.unwrap();
    assert_eq!(summary.skipped, vec!["schema c2"]);

    for file in [
        "connector-salesforce-salesforce-c1-from-list.json",
        "connector-salesforce-salesforce-c1.json",
        "connector-salesforce-salesforce-c1-schema.json",
        "connector-hubspot-hubspot-c2.json",
        "destination-raw_eu-AWS_EU-databricks-d1.json",
    ] {
        assert!(out.path().join(file).exists(), "missing {file}");
    }
    assert!(!out.path().join("connector-hubspot-hubspot-c2-schema.json").exists());
}

#[tokio::test]
async fn dump_state_maps_failures_to_null() {
    let server = account().await;
    let out = tempfile::tempdir().unwrap();

    let path = dump_state(&client(&server), out.path()).await.unwrap();
    assert_eq!(path, out.path().join("state").join("state.json"));
    assert_eq!(
        read_json(&path),
        json!({"c1": {"setup_state": "connected"}, "c2": null})
    );
}

#[tokio::test]
async fn paginated_list_aborts_dump() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/connectors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"items": [], "next_cursor": "next"}
        })))
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    assert!(matches!(
        dump(&client(&server), out.path()).await,
        Err(IngestError::PaginationNotImplemented(_))
    ));
}
