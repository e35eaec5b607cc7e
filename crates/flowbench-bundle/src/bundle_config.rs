//! Bundle configuration (databricks.yml): deployment targets and their variables

use crate::error::BundleError;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Variable holding the catalog identifier of a target
pub const CATALOG_IDENTIFIER_VARIABLE: &str = "ENV_CATALOG_IDENTIFIER";

/// A deployment target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleTarget {
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Bundle configuration subset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    #[serde(default)]
    pub targets: BTreeMap<String, BundleTarget>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BundleConfig {
    /// Load bundle configuration from file
    pub fn from_file(path: &Path) -> Result<Self, BundleError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents).map_err(|e| BundleError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse bundle configuration from YAML, resolving `<<` merge keys
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let mut value: Value = serde_yaml::from_str(yaml)?;
        value.apply_merge()?;
        serde_yaml::from_value(value)
    }

    /// Target key for a region, e.g. `personal_dev_eu`
    pub fn target_name(target_prefix: &str, region: &str) -> String {
        format!("{target_prefix}_{region}")
    }

    /// Catalog identifier of the personal target for `region`
    pub fn catalog_identifier(&self, target_prefix: &str, region: &str) -> Result<String, BundleError> {
        let target_name = Self::target_name(target_prefix, region);
        let target = self
            .targets
            .get(&target_name)
            .ok_or_else(|| BundleError::MissingTarget(target_name.clone()))?;

        let missing = || BundleError::MissingVariable {
            target: target_name.clone(),
            variable: CATALOG_IDENTIFIER_VARIABLE.to_string(),
        };

        match target.variables.get(CATALOG_IDENTIFIER_VARIABLE) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(missing()),
        }
    }
}
