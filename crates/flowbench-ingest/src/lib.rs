//! Ingestion SaaS metadata
//!
//! Reads connectors, destinations and connector schemas from the ingestion
//! REST API and writes them to disk as JSON.
//!
//! ## Example
//!
//! ```rust,ignore
//! use flowbench_ingest::{dump, HttpIngestionClient};
//!
//! let api = HttpIngestionClient::from_env("https://api.fivetran.com/v1", "FTA", 30)?;
//! let summary = dump(&api, Path::new("/workspace/fivetran/dump")).await?;
//! ```
//!
//! Responses carrying a pagination cursor are rejected: a dump is either
//! complete or fails.

pub mod client;
pub mod dump;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod listing;
pub mod mock;
pub mod models;

pub use client::{unwrap_envelope, HttpIngestionClient, IngestionApi};
pub use dump::{dump, dump_raw, dump_state, join_destinations, DumpSummary};
pub use error::IngestError;
pub use fetch::{
    fetch_connector, fetch_connector_schema, fetch_connector_state, fetch_destination,
    fetch_schema_config, find_connector_id, list_connectors, list_destinations, resolve_connector_id,
};
pub use filter::filter_disabled;
pub use listing::{connector_list_lines, connector_schema_lines, table_column_lines};
pub use mock::MockIngestionApi;
pub use models::{
    ColumnEntry, Connector, ConnectorRecord, Destination, DestinationConfig, ListPage,
    SchemaConfig, SchemaEntry, TableEntry,
};
