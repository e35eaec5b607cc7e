//! Response payloads from the orchestration platform

use crate::error::WorkspaceError;
use serde::{Deserialize, Serialize};

/// Structured name of a user (SCIM)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,
}

/// The authenticated user (`/api/2.0/preview/scim/v2/Me`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default)]
    pub user_name: Option<String>,

    #[serde(default)]
    pub name: UserName,
}

impl CurrentUser {
    /// Personal schema prefix: first initial, underscore, family name, underscore, lower-cased
    ///
    /// `Paul Burridge` becomes `p_burridge_`.
    pub fn schema_prefix(&self) -> Result<String, WorkspaceError> {
        let who = self.user_name.as_deref().unwrap_or("<unknown user>");

        let initial = self
            .name
            .given_name
            .as_deref()
            .and_then(|given| given.trim().chars().next())
            .ok_or_else(|| WorkspaceError::IncompleteIdentity(format!("{who} has no given name")))?;

        let family = self
            .name
            .family_name
            .as_deref()
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .ok_or_else(|| WorkspaceError::IncompleteIdentity(format!("{who} has no family name")))?;

        Ok(format!("{initial}_{family}_").to_lowercase())
    }
}

/// Job settings subset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `/api/2.1/jobs/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: u64,

    #[serde(default)]
    pub creator_user_name: Option<String>,

    #[serde(default)]
    pub settings: JobSettings,
}

/// `/api/2.1/jobs/list` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_page_token: Option<String>,
}
