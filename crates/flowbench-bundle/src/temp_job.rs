//! Ad-hoc ("temp") job definitions
//!
//! Wraps one located task in a job of its own so it can be deployed and run
//! without the rest of its pipeline.

use crate::error::BundleError;
use crate::locator::LocatedTask;
use crate::model::Task;
use crate::params::ParameterSet;
use flowbench_core::{PermissionGrant, TempJobSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Single-task job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempJob {
    pub name: String,
    pub permissions: Vec<PermissionGrant>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempJobResources {
    pub jobs: BTreeMap<String, TempJob>,
}

/// Resource document written to the temp job file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempJobDocument {
    pub resources: TempJobResources,
}

impl TempJobDocument {
    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, BundleError> {
        serde_yaml::to_string(self).map_err(|e| BundleError::Serialize(e.to_string()))
    }
}

/// Builds temp job documents and writes them to a fixed path
#[derive(Debug, Clone)]
pub struct TempJobEmitter {
    settings: TempJobSettings,
    output_path: PathBuf,
}

impl TempJobEmitter {
    pub fn new(settings: TempJobSettings, output_path: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            output_path: output_path.into(),
        }
    }

    /// Where the job definition is written
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Build the document for a task and its resolved parameters
    pub fn build(&self, located: &LocatedTask, params: &ParameterSet) -> TempJobDocument {
        let job = TempJob {
            name: self.settings.name.clone(),
            permissions: self.settings.permissions.clone(),
            tasks: vec![located.task.detached_with_parameters(params)],
        };

        TempJobDocument {
            resources: TempJobResources {
                jobs: BTreeMap::from([(self.settings.job_key.clone(), job)]),
            },
        }
    }

    /// Build and write the document, replacing any previous one
    pub fn emit(&self, located: &LocatedTask, params: &ParameterSet) -> Result<TempJobDocument, BundleError> {
        let document = self.build(located, params);
        let yaml = document.to_yaml()?;

        if let Some(dir) = self.output_path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| BundleError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.output_path, yaml).map_err(|source| BundleError::Io {
            path: self.output_path.clone(),
            source,
        })?;

        tracing::info!(
            "Wrote temp job for '{}' to {}",
            located.job_name,
            self.output_path.display()
        );
        Ok(document)
    }
}
