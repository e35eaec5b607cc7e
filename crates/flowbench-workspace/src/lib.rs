//! Orchestration platform client
//!
//! Only two things are needed from the platform: who the current user is
//! (for the personal schema prefix) and which jobs exist.
//!
//! ## Example
//!
//! ```rust,ignore
//! use flowbench_workspace::{Profile, WorkspaceApi, WorkspaceClient};
//!
//! let profile = Profile::load(&Profile::default_path()?, "default-na")?;
//! let client = WorkspaceClient::from_profile(&profile, 30)?;
//! let user = client.current_user().await?;
//! println!("{}", user.schema_prefix()?);
//! ```

pub mod client;
pub mod error;
pub mod mock;
pub mod models;
pub mod profile;

pub use client::{WorkspaceApi, WorkspaceClient};
pub use error::WorkspaceError;
pub use mock::MockWorkspace;
pub use models::{CurrentUser, JobList, JobSettings, JobSummary, UserName};
pub use profile::Profile;
