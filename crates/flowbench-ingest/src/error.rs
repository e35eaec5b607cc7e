//! Error types for the ingestion API and dumps

use std::path::PathBuf;

/// Errors that can occur when reading ingestion metadata
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}) for {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Pagination not implemented yet but {0} returned a next_cursor")]
    PaginationNotImplemented(String),

    #[error("Response from {0} has no 'data' field")]
    MissingData(String),

    #[error("No connector named or identified by '{0}'")]
    ConnectorNotFound(String),

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {0}: {1}")]
    Serialize(String, String),
}

impl IngestError {
    /// True for errors reported by the API itself (non-2xx responses)
    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::Http { .. })
    }
}
