//! Task parameter resolution
//!
//! Job defaults are overlaid with task overrides, then the two environment
//! variables the bundle interpolates at deploy time are replaced with the
//! values of the developer's personal target.

use crate::bundle_config::BundleConfig;
use crate::error::BundleError;
use crate::model::{Job, Task};
use flowbench_workspace::WorkspaceApi;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder for the target's catalog identifier
pub const CATALOG_PLACEHOLDER: &str = "${var.ENV_CATALOG_IDENTIFIER}";

/// Placeholder for the developer's schema prefix
pub const SCHEMA_PREFIX_PLACEHOLDER: &str = "${var.ENV_SCHEMA_PREFIX}";

/// Resolved parameter name -> value
pub type ParameterSet = BTreeMap<String, String>;

/// Values substituted into every parameter, computed once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    pub catalog_identifier: String,
    pub schema_prefix: String,
}

impl ResolutionContext {
    pub fn new(catalog_identifier: impl Into<String>, schema_prefix: impl Into<String>) -> Self {
        Self {
            catalog_identifier: catalog_identifier.into(),
            schema_prefix: schema_prefix.into(),
        }
    }

    /// Look up the region's catalog and the authenticated user's schema prefix
    pub async fn build(
        bundle: &BundleConfig,
        target_prefix: &str,
        region: &str,
        workspace: &dyn WorkspaceApi,
    ) -> Result<Self, BundleError> {
        let catalog_identifier = bundle.catalog_identifier(target_prefix, region)?;

        let user = workspace
            .current_user()
            .await
            .map_err(BundleError::MissingIdentity)?;
        let schema_prefix = user.schema_prefix().map_err(BundleError::MissingIdentity)?;

        tracing::debug!(
            "Resolving for catalog '{}' with schema prefix '{}'",
            catalog_identifier,
            schema_prefix
        );
        Ok(Self::new(catalog_identifier, schema_prefix))
    }

    /// Replace both placeholders in `value`
    pub fn apply(&self, value: &str) -> String {
        value
            .replace(CATALOG_PLACEHOLDER, &self.catalog_identifier)
            .replace(SCHEMA_PREFIX_PLACEHOLDER, &self.schema_prefix)
    }
}

fn scalar_to_string(name: &str, value: &Value) -> Result<String, BundleError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(BundleError::NonScalarParameter(name.to_string())),
    }
}

/// Job defaults, overlaid by task overrides, with placeholders substituted
pub fn resolve_parameters(
    job: &Job,
    task: &Task,
    context: &ResolutionContext,
) -> Result<ParameterSet, BundleError> {
    let mut merged: BTreeMap<&str, &Value> = job
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), &p.default))
        .collect();

    if let Some(overrides) = task.parameter_overrides() {
        for (name, value) in overrides {
            merged.insert(name.as_str(), value);
        }
    }

    merged
        .into_iter()
        .map(|(name, value)| {
            let text = scalar_to_string(name, value)?;
            Ok((name.to_string(), context.apply(&text)))
        })
        .collect()
}

/// Fully qualified output table of a SQL file: `catalog.schema.table`
///
/// Unknown parts are shown as `?`.
pub fn table_identifier(params: &ParameterSet, sql_file: &Path) -> String {
    let part = |key: &str| params.get(key).map(String::as_str).unwrap_or("?");
    let table = sql_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("?");

    format!(
        "{}.{}.{}",
        part("output_catalog_name"),
        part("output_schema_name"),
        table
    )
}
