//! Find the job and task that run a SQL file
//!
//! SQL files are referenced from job definitions by relative paths such as
//! `../../sql/reporting/orders.sql`, so matching is done on the part of the
//! path after the SQL marker (`/sql/` by default).

use crate::error::BundleError;
use crate::model::{Job, ResourceFile, Task};
use flowbench_core::{BundleSettings, RepoLayout};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A task together with the job that declares it
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedTask {
    pub job_name: String,
    pub job: Job,
    pub task: Task,
    /// Resource file declaring the job
    pub source_file: PathBuf,
}

/// Scans a resource tree for job definitions
#[derive(Debug, Clone)]
pub struct Locator {
    resources_dir: PathBuf,
    temp_dir_name: String,
    sql_marker: String,
}

impl Locator {
    pub fn new(
        resources_dir: impl Into<PathBuf>,
        temp_dir_name: impl Into<String>,
        sql_marker: impl Into<String>,
    ) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            temp_dir_name: temp_dir_name.into(),
            sql_marker: sql_marker.into(),
        }
    }

    pub fn from_layout(layout: &RepoLayout, settings: &BundleSettings) -> Self {
        Self::new(&layout.resources_dir, &settings.temp_dir, &settings.sql_marker)
    }

    /// Part of `sql_file` after the last SQL marker
    pub fn sql_suffix<'a>(&self, sql_file: &'a str) -> Result<&'a str, BundleError> {
        let invalid = || BundleError::InvalidSqlPath {
            path: sql_file.to_string(),
            marker: self.sql_marker.clone(),
        };

        let (_, suffix) = sql_file.rsplit_once(self.sql_marker.as_str()).ok_or_else(invalid)?;
        if suffix.is_empty() {
            return Err(invalid());
        }
        Ok(suffix)
    }

    /// Resource files in file-name order, skipping the generated-jobs directory
    pub fn resource_files(&self) -> Result<Vec<PathBuf>, BundleError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.resources_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && entry.file_name() == self.temp_dir_name.as_str())
            });

        for entry in walker {
            let entry = entry.map_err(|e| BundleError::Walk {
                path: self.resources_dir.clone(),
                message: e.to_string(),
            })?;

            if entry.file_type().is_file() && is_yaml(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// All jobs of the resource tree, in scan order
    pub fn jobs(&self) -> Result<Vec<(PathBuf, String, Job)>, BundleError> {
        let mut jobs = Vec::new();
        for path in self.resource_files()? {
            tracing::debug!("Scanning {}", path.display());
            for (name, job) in ResourceFile::from_file(&path)?.into_jobs() {
                jobs.push((path.clone(), name, job));
            }
        }
        Ok(jobs)
    }

    /// First task whose file reference ends with the suffix of `sql_file`
    pub fn find(&self, sql_file: &str) -> Result<Option<LocatedTask>, BundleError> {
        let suffix = self.sql_suffix(sql_file)?;

        for (source_file, job_name, job) in self.jobs()? {
            let matched = job
                .tasks
                .iter()
                .find(|task| task.file_path().is_some_and(|path| path.ends_with(suffix)))
                .cloned();

            if let Some(task) = matched {
                tracing::debug!(
                    "Found {} in job '{}' ({})",
                    suffix,
                    job_name,
                    source_file.display()
                );
                return Ok(Some(LocatedTask {
                    job_name,
                    job,
                    task,
                    source_file,
                }));
            }
        }

        Ok(None)
    }

    /// Like [`Locator::find`], but a miss is an error
    pub fn require(&self, sql_file: &str) -> Result<LocatedTask, BundleError> {
        self.find(sql_file)?
            .ok_or_else(|| BundleError::JobNotFound(sql_file.to_string()))
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_after_last_marker() {
        let locator = Locator::new("/repo/resources", "_temp_", "/sql/");
        assert_eq!(
            locator.sql_suffix("/repo/sql/reporting/sql/orders.sql").unwrap(),
            "orders.sql"
        );
        assert_eq!(
            locator.sql_suffix("/repo/sql/reporting/orders.sql").unwrap(),
            "reporting/orders.sql"
        );
    }

    #[test]
    fn path_without_marker_is_rejected() {
        let locator = Locator::new("/repo/resources", "_temp_", "/sql/");
        assert!(matches!(
            locator.sql_suffix("reporting/orders.sql"),
            Err(BundleError::InvalidSqlPath { .. })
        ));
        assert!(matches!(
            locator.sql_suffix("/repo/sql/"),
            Err(BundleError::InvalidSqlPath { .. })
        ));
    }

    #[test]
    fn yaml_extensions() {
        assert!(is_yaml(Path::new("a/job.yml")));
        assert!(is_yaml(Path::new("a/job.yaml")));
        assert!(!is_yaml(Path::new("a/job.json")));
    }
}
