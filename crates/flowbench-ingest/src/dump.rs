//! Write ingestion metadata to disk as JSON
//!
//! Layout under the output directory:
//!
//! ```text
//! all/connector-{schema}-{service}-{catalogs}-{id}-from-list.json
//! enabled/connector-{schema}-{service}-{catalogs}-{id}-from-list.json
//! state/state.json
//! ```

use crate::client::IngestionApi;
use crate::error::IngestError;
use crate::fetch::{
    fetch_connector, fetch_connector_schema, fetch_connector_state, fetch_destination,
    list_connectors, list_destinations,
};
use crate::filter::filter_disabled;
use crate::models::{Connector, ConnectorRecord, Destination};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What a dump wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Files written
    pub written: Vec<PathBuf>,
    /// Records skipped because their detail could not be fetched
    pub skipped: Vec<String>,
}

fn create_dir(path: &Path) -> Result<(), IngestError> {
    std::fs::create_dir_all(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IngestError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| IngestError::Serialize(path.display().to_string(), e.to_string()))?;

    std::fs::write(path, json).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Attach to every connector the destinations sharing its group
///
/// Destinations of a group are ordered by id.
pub fn join_destinations(
    connectors: Vec<(Connector, Value)>,
    destinations: &[Destination],
) -> Vec<ConnectorRecord> {
    let mut by_group: BTreeMap<&str, Vec<&Destination>> = BTreeMap::new();
    for destination in destinations {
        by_group
            .entry(destination.group_id.as_str())
            .or_default()
            .push(destination);
    }
    for group in by_group.values_mut() {
        group.sort_by(|a, b| a.id.cmp(&b.id));
    }

    connectors
        .into_iter()
        .map(|(connector, schemas)| {
            let destinations = by_group
                .get(connector.group_id.as_str())
                .map(|group| group.iter().map(|d| (*d).clone()).collect())
                .unwrap_or_default();

            ConnectorRecord {
                connector,
                schemas,
                destinations,
            }
        })
        .collect()
}

/// Copy of `record` with disabled schemas, tables and columns removed
///
/// `None` when the record carries no schema tree.
fn enabled_only(record: &ConnectorRecord) -> Option<ConnectorRecord> {
    let tree = record.schemas.as_object()?.get("schemas")?.clone();

    let mut enabled = record.clone();
    if let Some(object) = enabled.schemas.as_object_mut() {
        object.insert("schemas".to_string(), filter_disabled(tree));
    }
    Some(enabled)
}

/// Dump every connector with its schema and destinations
///
/// Writes the unfiltered record to `all/` and the enabled-only record to
/// `enabled/`.
pub async fn dump(api: &dyn IngestionApi, output_dir: &Path) -> Result<DumpSummary, IngestError> {
    let all_dir = output_dir.join("all");
    let enabled_dir = output_dir.join("enabled");
    create_dir(&all_dir)?;
    create_dir(&enabled_dir)?;

    let mut summary = DumpSummary::default();

    let mut connectors = Vec::new();
    for item in list_connectors(api).await? {
        let Some(connector) = fetch_connector(api, &item.id).await? else {
            summary.skipped.push(format!("connector {}", item.id));
            continue;
        };
        let schemas = fetch_connector_schema(api, &item.id)
            .await?
            .unwrap_or(Value::Null);
        connectors.push((connector, schemas));
    }

    let mut destinations = Vec::new();
    for item in list_destinations(api).await? {
        match fetch_destination(api, &item.id).await? {
            Some(destination) => destinations.push(destination),
            None => summary.skipped.push(format!("destination {}", item.id)),
        }
    }

    for record in join_destinations(connectors, &destinations) {
        let file_name = format!("{}-from-list.json", record.file_prefix());

        let path = all_dir.join(&file_name);
        write_json(&path, &record)?;
        summary.written.push(path);

        if let Some(enabled) = enabled_only(&record) {
            let path = enabled_dir.join(&file_name);
            write_json(&path, &enabled)?;
            summary.written.push(path);
        }
    }

    tracing::info!(
        "Dumped {} files to {} ({} skipped)",
        summary.written.len(),
        output_dir.display(),
        summary.skipped.len()
    );
    Ok(summary)
}

/// Dump the API responses unmodified, one file per response
pub async fn dump_raw(api: &dyn IngestionApi, output_dir: &Path) -> Result<DumpSummary, IngestError> {
    create_dir(output_dir)?;
    let mut summary = DumpSummary::default();

    for item in list_connectors(api).await? {
        let prefix = format!("connector-{}-{}-{}", item.schema, item.service, item.id);
        tracing::info!("{}", prefix);

        let path = output_dir.join(format!("{prefix}-from-list.json"));
        write_json(&path, &item)?;
        summary.written.push(path);

        match fetch_connector(api, &item.id).await? {
            Some(connector) => {
                let path = output_dir.join(format!("{prefix}.json"));
                write_json(&path, &connector)?;
                summary.written.push(path);
            }
            None => summary.skipped.push(format!("connector {}", item.id)),
        }

        match fetch_connector_schema(api, &item.id).await? {
            Some(schema) => {
                let path = output_dir.join(format!("{prefix}-schema.json"));
                write_json(&path, &schema)?;
                summary.written.push(path);
            }
            None => summary.skipped.push(format!("schema {}", item.id)),
        }
    }

    for item in list_destinations(api).await? {
        let Some(destination) = fetch_destination(api, &item.id).await? else {
            summary.skipped.push(format!("destination {}", item.id));
            continue;
        };

        let prefix = format!(
            "destination-{}-{}-{}-{}",
            destination.catalog(),
            destination.region,
            destination.service,
            item.id
        );
        let path = output_dir.join(format!("{prefix}.json"));
        write_json(&path, &destination)?;
        summary.written.push(path);
    }

    Ok(summary)
}

/// Write the sync state of every connector to `state/state.json`
///
/// Connectors whose state could not be read map to `null`.
pub async fn dump_state(api: &dyn IngestionApi, output_dir: &Path) -> Result<PathBuf, IngestError> {
    let state_dir = output_dir.join("state");
    create_dir(&state_dir)?;

    let mut states = BTreeMap::new();
    for item in list_connectors(api).await? {
        let state = fetch_connector_state(api, &item.id)
            .await?
            .unwrap_or(Value::Null);
        states.insert(item.id, state);
    }

    let path = state_dir.join("state.json");
    write_json(&path, &states)?;
    tracing::info!("Wrote state of {} connectors to {}", states.len(), path.display());
    Ok(path)
}
