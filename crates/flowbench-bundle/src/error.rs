//! Bundle error types

use flowbench_workspace::WorkspaceError;
use std::path::PathBuf;

/// Errors raised while reading bundles and resolving task parameters
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {path}: {message}")]
    Yaml { path: PathBuf, message: String },

    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("SQL path '{path}' does not contain '{marker}'")]
    InvalidSqlPath { path: String, marker: String },

    #[error("No job task references '{0}'")]
    JobNotFound(String),

    #[error("Missing region target '{0}' in bundle configuration")]
    MissingTarget(String),

    #[error("Target '{target}' does not define variable '{variable}'")]
    MissingVariable { target: String, variable: String },

    #[error("No authenticated identity: {0}")]
    MissingIdentity(#[source] WorkspaceError),

    #[error("Parameter '{0}' is not a scalar value")]
    NonScalarParameter(String),

    #[error("Failed to serialize job definition: {0}")]
    Serialize(String),
}
