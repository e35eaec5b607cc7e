//! Human readable listings of connectors and their schema mapping

use crate::models::{Connector, SchemaConfig, TableEntry};

const NOT_SYNCED: &str = "X";

fn destination_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("?")
}

fn is_enabled(enabled: Option<bool>) -> bool {
    enabled.unwrap_or(true)
}

/// `schema - service - id`, ordered by schema
pub fn connector_list_lines(connectors: &[Connector]) -> Vec<String> {
    let mut sorted: Vec<&Connector> = connectors.iter().collect();
    sorted.sort_by(|a, b| a.schema.cmp(&b.schema));

    sorted
        .into_iter()
        .map(|c| format!("{} - {} - {}", c.schema, c.service, c.id))
        .collect()
}

/// `schema.table -> dest_schema.dest_table`, or `-> X` for disabled tables
pub fn connector_schema_lines(config: &SchemaConfig) -> Vec<String> {
    let mut lines = Vec::new();

    for (schema_name, schema) in &config.schemas {
        let destination_schema = destination_name(&schema.name_in_destination);
        for (table_name, table) in &schema.tables {
            if is_enabled(table.enabled) {
                lines.push(format!(
                    "{schema_name}.{table_name} -> {destination_schema}.{}",
                    destination_name(&table.name_in_destination)
                ));
            } else {
                lines.push(format!("{schema_name}.{table_name} -> {NOT_SYNCED}"));
            }
        }
    }

    lines
}

fn table_matches(table_name: &str, table: &TableEntry, wanted: &str) -> bool {
    table_name.to_lowercase() == wanted
        || table
            .name_in_destination
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == wanted)
}

/// Column mapping of every table named `table` in the source or destination
///
/// Matching ignores case.
pub fn table_column_lines(config: &SchemaConfig, table: &str) -> Vec<String> {
    let wanted = table.to_lowercase();
    let mut lines = Vec::new();

    for (schema_name, schema) in &config.schemas {
        let destination_schema = destination_name(&schema.name_in_destination);

        for (table_name, entry) in &schema.tables {
            if !table_matches(table_name, entry, &wanted) {
                continue;
            }
            let destination_table = destination_name(&entry.name_in_destination);

            for (column_name, column) in &entry.columns {
                let source = format!("{schema_name}.{table_name}.{column_name}");
                if is_enabled(column.enabled) {
                    lines.push(format!(
                        "{source} -> {destination_schema}.{destination_table}.{}",
                        destination_name(&column.name_in_destination)
                    ));
                } else {
                    lines.push(format!("{source} -> {NOT_SYNCED}"));
                }
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> SchemaConfig {
        serde_json::from_value(json!({
            "schemas": {
                "sf": {
                    "name_in_destination": "salesforce",
                    "tables": {
                        "Account": {
                            "name_in_destination": "account",
                            "enabled": true,
                            "columns": {
                                "Id": {"name_in_destination": "id", "enabled": true},
                                "Secret__c": {"name_in_destination": "secret_c", "enabled": false}
                            }
                        },
                        "History": {"name_in_destination": "history", "enabled": false}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn connectors_sorted_by_schema() {
        let connector = |id: &str, schema: &str| Connector {
            id: id.to_string(),
            schema: schema.to_string(),
            service: "svc".to_string(),
            ..Connector::default()
        };

        let lines = connector_list_lines(&[connector("2", "zendesk"), connector("1", "hubspot")]);
        assert_eq!(lines, vec!["hubspot - svc - 1", "zendesk - svc - 2"]);
    }

    #[test]
    fn schema_mapping() {
        assert_eq!(
            connector_schema_lines(&config()),
            vec!["sf.Account -> salesforce.account", "sf.History -> X"]
        );
    }

    #[test]
    fn columns_match_destination_name_case_insensitively() {
        let expected = vec!["sf.Account.Id -> salesforce.account.id", "sf.Account.Secret__c -> X"];
        assert_eq!(table_column_lines(&config(), "ACCOUNT"), expected);
        assert_eq!(table_column_lines(&config(), "account"), expected);
        assert!(table_column_lines(&config(), "opportunity").is_empty());
    }
}
