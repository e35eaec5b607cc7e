//! Ingestion API payloads
//!
//! Only the fields the tooling reads are named. Everything else is kept in
//! `extra` so dumps reproduce the API response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `data` of a list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// A connector, as returned by `connectors` and `connectors/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,

    /// Connector name, also the destination schema
    #[serde(default)]
    pub schema: String,

    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub group_id: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A destination warehouse, as returned by `destinations/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,

    #[serde(default)]
    pub group_id: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub config: DestinationConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Destination {
    /// Catalog written to, `unknown` when the config does not name one
    pub fn catalog(&self) -> &str {
        self.config.catalog.as_deref().unwrap_or("unknown")
    }
}

/// `data` of `connectors/{id}/schemas`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(default)]
    pub name_in_destination: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub tables: BTreeMap<String, TableEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableEntry {
    #[serde(default)]
    pub name_in_destination: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub columns: BTreeMap<String, ColumnEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnEntry {
    #[serde(default)]
    pub name_in_destination: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A connector joined with its schema config and the destinations of its group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorRecord {
    #[serde(flatten)]
    pub connector: Connector,

    /// Schema config as returned by the API, `null` when it could not be read
    pub schemas: Value,

    pub destinations: Vec<Destination>,
}

impl ConnectorRecord {
    /// `connector-{schema}-{service}-{catalogs}-{id}`
    pub fn file_prefix(&self) -> String {
        let catalogs = self
            .destinations
            .iter()
            .map(Destination::catalog)
            .collect::<Vec<_>>()
            .join("-");

        format!(
            "connector-{}-{}-{}-{}",
            self.connector.schema, self.connector.service, catalogs, self.connector.id
        )
    }
}
