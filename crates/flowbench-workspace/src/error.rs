//! Error types for the orchestration platform client

/// Errors raised while talking to the orchestration platform
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Failed to read profile file {0}: {1}")]
    ProfileIo(String, String),

    #[error("Profile '{profile}' not found in {path}")]
    ProfileNotFound { profile: String, path: String },

    #[error("Profile '{profile}' has no '{key}' entry")]
    MissingProfileKey { profile: String, key: String },

    #[error("No home directory to look for the profile file in")]
    NoHomeDirectory,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}) for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Pagination not implemented but {0} reported more results")]
    PaginationNotImplemented(String),

    #[error("Authenticated identity is incomplete: {0}")]
    IncompleteIdentity(String),
}
