//! Configuration schema (flowbench.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Group permission attached to every ad-hoc job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Workspace group receiving the grant
    pub group_name: String,

    /// Permission level (e.g. CAN_MANAGE_RUN)
    pub level: String,
}

/// Shape of the generated ad-hoc job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempJobSettings {
    /// Key of the job under `resources.jobs`
    pub job_key: String,

    /// Display name of the job (bundle interpolation is left to the platform)
    pub name: String,

    /// Permissions granted on the job
    pub permissions: Vec<PermissionGrant>,
}

impl Default for TempJobSettings {
    fn default() -> Self {
        Self {
            job_key: "temp_job".to_string(),
            name: "temp_job_${bundle.target}".to_string(),
            permissions: vec![PermissionGrant {
                group_name: "SG-Databricks-Engineering-dev-na".to_string(),
                level: "CAN_MANAGE_RUN".to_string(),
            }],
        }
    }
}

/// Resource bundle layout and target naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleSettings {
    /// Repository root; discovered from `.git` when absent
    pub repo_root: Option<PathBuf>,

    /// Directory holding job definitions, relative to the repository root
    pub resources_dir: PathBuf,

    /// Name of the subdirectory of `resources_dir` that receives generated jobs
    pub temp_dir: String,

    /// File name of the generated job
    pub temp_job_file: String,

    /// Bundle configuration file, relative to the repository root
    pub bundle_config: PathBuf,

    /// Prefix of personal targets; the target key is `{target_prefix}_{region}`
    pub target_prefix: String,

    /// Path segment after which SQL file references are compared
    pub sql_marker: String,

    /// Generated job shape
    pub temp_job: TempJobSettings,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            repo_root: None,
            resources_dir: PathBuf::from("resources"),
            temp_dir: "_temp_".to_string(),
            temp_job_file: "_temp_job.yml".to_string(),
            bundle_config: PathBuf::from("databricks.yml"),
            target_prefix: "personal_dev".to_string(),
            sql_marker: "/sql/".to_string(),
            temp_job: TempJobSettings::default(),
        }
    }
}

/// Orchestration platform connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Named connection profile
    pub profile: String,

    /// Profile file; falls back to $DATABRICKS_CONFIG_FILE, then ~/.databrickscfg
    pub config_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            profile: "default-na".to_string(),
            config_file: None,
            timeout_secs: 30,
        }
    }
}

/// Ingestion SaaS connection and dump location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// API root, without trailing slash
    pub base_url: String,

    /// Environment variable holding the base64 encoded API key
    pub credential_env: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Default output directory for dumps
    pub output_dir: PathBuf,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.fivetran.com/v1".to_string(),
            credential_env: "FTA".to_string(),
            timeout_secs: 30,
            output_dir: PathBuf::from("dump"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowbenchConfig {
    #[serde(default)]
    pub bundle: BundleSettings,

    #[serde(default)]
    pub workspace: WorkspaceSettings,

    #[serde(default)]
    pub ingest: IngestSettings,

    /// Directory the config was loaded from (for resolving relative paths)
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl FlowbenchConfig {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        if let Some(parent) = path.parent() {
            config.config_dir = Some(parent.to_path_buf());
        }

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Explicit repository root, resolved against the config file location
    pub fn configured_repo_root(&self) -> Option<PathBuf> {
        let root = self.bundle.repo_root.as_ref()?;
        match &self.config_dir {
            Some(dir) if root.is_relative() => Some(dir.join(root)),
            _ => Some(root.clone()),
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
