//! In-memory orchestration platform for tests
//!
//! ```rust,ignore
//! let workspace = MockWorkspace::new().with_user("Paul", "Burridge");
//! assert_eq!(workspace.current_user().await?.schema_prefix()?, "p_burridge_");
//!
//! let offline = MockWorkspace::new().with_connection_failure();
//! assert!(offline.current_user().await.is_err());
//! ```

use crate::client::WorkspaceApi;
use crate::error::WorkspaceError;
use crate::models::{CurrentUser, JobSettings, JobSummary, UserName};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock orchestration platform
#[derive(Debug, Clone, Default)]
pub struct MockWorkspace {
    user: Option<CurrentUser>,
    jobs: Arc<RwLock<Vec<JobSummary>>>,
    fail_connection: bool,
}

impl MockWorkspace {
    /// Create an empty mock with no authenticated user
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authenticated user
    pub fn with_user(mut self, given_name: &str, family_name: &str) -> Self {
        self.user = Some(CurrentUser {
            user_name: Some(format!(
                "{}.{}@example.com",
                given_name.to_lowercase(),
                family_name.to_lowercase()
            )),
            name: UserName {
                given_name: Some(given_name.to_string()),
                family_name: Some(family_name.to_string()),
            },
        });
        self
    }

    /// Simulate an unreachable platform
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Register a job
    pub async fn add_job(&self, job_id: u64, name: &str) {
        self.jobs.write().await.push(JobSummary {
            job_id,
            creator_user_name: None,
            settings: JobSettings {
                name: Some(name.to_string()),
            },
        });
    }

    fn check_connection(&self) -> Result<(), WorkspaceError> {
        if self.fail_connection {
            return Err(WorkspaceError::Api {
                status: 503,
                url: "mock://workspace".to_string(),
                message: "Mock connection failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl WorkspaceApi for MockWorkspace {
    async fn current_user(&self) -> Result<CurrentUser, WorkspaceError> {
        self.check_connection()?;
        self.user.clone().ok_or_else(|| WorkspaceError::Api {
            status: 401,
            url: "mock://workspace/Me".to_string(),
            message: "No authenticated user".to_string(),
        })
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>, WorkspaceError> {
        self.check_connection()?;
        Ok(self.jobs.read().await.clone())
    }
}
