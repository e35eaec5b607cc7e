//! Flowbench Core
//!
//! Configuration (flowbench.toml) and repository layout shared by every
//! other crate. Nothing here talks to the network.

pub mod config;
pub mod layout;

pub use config::{
    BundleSettings, ConfigError, FlowbenchConfig, IngestSettings, PermissionGrant,
    TempJobSettings, WorkspaceSettings,
};
pub use layout::{find_repo_root, LayoutError, RepoLayout};
