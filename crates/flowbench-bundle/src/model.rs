//! Job definitions as declared in bundle resource files
//!
//! Only the fields this crate reads are named; everything else is kept in
//! `extra` so a task can be written back out without losing settings.

use crate::error::BundleError;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A resource file (`resources/**/*.yml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceFile {
    #[serde(default)]
    pub resources: Option<Resources>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResourceFile {
    /// Parse a resource file; empty documents yield an empty file
    pub fn from_file(path: &Path) -> Result<Self, BundleError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents).map_err(|message| BundleError::Yaml {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse resource file contents, resolving `<<` merge keys
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let mut value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        if value.is_null() {
            return Ok(Self::default());
        }
        value.apply_merge().map_err(|e| e.to_string())?;
        serde_yaml::from_value(value).map_err(|e| e.to_string())
    }

    /// Jobs declared in this file, in key order
    pub fn into_jobs(self) -> BTreeMap<String, Job> {
        self.resources.map(|r| r.jobs).unwrap_or_default()
    }
}

/// The `resources` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub jobs: BTreeMap<String, Job>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Job-level parameter with its default value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameter {
    pub name: String,

    #[serde(default)]
    pub default: Value,
}

/// A job definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<JobParameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Reference to the SQL file run by a SQL task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlFileRef {
    pub path: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `sql_task` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<SqlFileRef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `notebook_task` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookTask {
    pub notebook_path: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub base_parameters: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A task within a job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_task: Option<SqlTask>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_task: Option<NotebookTask>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Task {
    /// File run by this task: the SQL file of a SQL task, else the notebook path
    pub fn file_path(&self) -> Option<&str> {
        if let Some(sql) = &self.sql_task {
            return sql.file.as_ref().map(|f| f.path.as_str());
        }
        self.notebook_task.as_ref().map(|n| n.notebook_path.as_str())
    }

    /// Task-level parameter overrides
    pub fn parameter_overrides(&self) -> Option<&BTreeMap<String, Value>> {
        if let Some(sql) = &self.sql_task {
            return Some(&sql.parameters);
        }
        self.notebook_task.as_ref().map(|n| &n.base_parameters)
    }

    /// Copy of this task with upstream edges removed and parameters replaced
    pub fn detached_with_parameters(&self, params: &BTreeMap<String, String>) -> Task {
        let resolved: BTreeMap<String, Value> = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let mut task = self.clone();
        task.depends_on = None;
        if let Some(sql) = task.sql_task.as_mut() {
            sql.parameters = resolved;
        } else if let Some(notebook) = task.notebook_task.as_mut() {
            notebook.base_parameters = resolved;
        }
        task
    }
}
