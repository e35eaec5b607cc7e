//! Repository layout: where job definitions, bundle config and generated jobs live

use crate::config::FlowbenchConfig;
use std::path::{Path, PathBuf};

/// Layout resolution errors
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("No repository root (.git) found above {0}")]
    RepoRootNotFound(String),

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(String),
}

/// Walk up from `start` to the first directory containing `.git`
pub fn find_repo_root(start: &Path) -> Result<PathBuf, LayoutError> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| LayoutError::RepoRootNotFound(start.display().to_string()))
}

/// Absolute paths derived from the repository root and bundle settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    pub root: PathBuf,
    pub resources_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub temp_job_path: PathBuf,
    pub bundle_config: PathBuf,
}

impl RepoLayout {
    /// Build the layout for a known repository root
    pub fn new(root: impl Into<PathBuf>, config: &FlowbenchConfig) -> Self {
        let root = root.into();
        let bundle = &config.bundle;
        let resources_dir = root.join(&bundle.resources_dir);
        let temp_dir = resources_dir.join(&bundle.temp_dir);

        Self {
            temp_job_path: temp_dir.join(&bundle.temp_job_file),
            bundle_config: root.join(&bundle.bundle_config),
            resources_dir,
            temp_dir,
            root,
        }
    }

    /// Use the configured root, or discover it from the current directory
    pub fn discover(config: &FlowbenchConfig) -> Result<Self, LayoutError> {
        let root = match config.configured_repo_root() {
            Some(root) => root,
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|e| LayoutError::CurrentDir(e.to_string()))?;
                find_repo_root(&cwd)?
            }
        };

        tracing::debug!("Repository root: {}", root.display());
        Ok(Self::new(root, config))
    }

    /// Resolve a user supplied SQL path: absolute paths are kept, relative ones
    /// are taken from the repository root
    pub fn sql_path(&self, sql_file: &str) -> PathBuf {
        let path = Path::new(sql_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
