//! HTTP client for the orchestration platform REST API

use crate::error::WorkspaceError;
use crate::models::{CurrentUser, JobList, JobSummary};
use crate::profile::Profile;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Operations needed from the orchestration platform
#[async_trait::async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// The authenticated user
    async fn current_user(&self) -> Result<CurrentUser, WorkspaceError>;

    /// All jobs visible to the authenticated user
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, WorkspaceError>;
}

/// Token authenticated REST client
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    /// Workspace URL without trailing slash
    host: String,
    token: String,
    client: Client,
}

impl WorkspaceClient {
    /// Create a client for a host with a personal access token
    pub fn new(host: impl Into<String>, token: impl Into<String>, timeout_secs: u64) -> Result<Self, WorkspaceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            host: host.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    /// Create a client from a named connection profile
    pub fn from_profile(profile: &Profile, timeout_secs: u64) -> Result<Self, WorkspaceError> {
        Self::new(&profile.host, &profile.token, timeout_secs)
    }

    /// Workspace URL
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, WorkspaceError> {
        let url = format!("{}/{}", self.host, path.trim_start_matches('/'));
        tracing::info!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WorkspaceError::Api {
                status: status.as_u16(),
                url,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WorkspaceError::Parse(format!("{url}: {e}")))
    }
}

#[async_trait::async_trait]
impl WorkspaceApi for WorkspaceClient {
    async fn current_user(&self) -> Result<CurrentUser, WorkspaceError> {
        self.get("api/2.0/preview/scim/v2/Me").await
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>, WorkspaceError> {
        let path = "api/2.1/jobs/list?limit=100";
        let page: JobList = self.get(path).await?;

        if page.has_more || page.next_page_token.as_deref().is_some_and(|t| !t.is_empty()) {
            return Err(WorkspaceError::PaginationNotImplemented(format!(
                "{}/{}",
                self.host, path
            )));
        }

        Ok(page.jobs)
    }
}
