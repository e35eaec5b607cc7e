//! Resource bundle handling
//!
//! This crate handles:
//! - Parsing job definitions from the bundle's YAML resource tree
//! - Locating the job/task that runs a given SQL file
//! - Resolving task parameters for a personal target
//! - Emitting a standalone ad-hoc job for one task

pub mod bundle_config;
pub mod error;
pub mod locator;
pub mod model;
pub mod params;
pub mod temp_job;

pub use bundle_config::{BundleConfig, BundleTarget};
pub use error::BundleError;
pub use locator::{LocatedTask, Locator};
pub use model::{Job, JobParameter, NotebookTask, ResourceFile, Resources, SqlFileRef, SqlTask, Task};
pub use params::{resolve_parameters, table_identifier, ParameterSet, ResolutionContext};
pub use temp_job::{TempJob, TempJobDocument, TempJobEmitter, TempJobResources};
