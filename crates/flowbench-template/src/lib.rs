//! SQL template handling for local previews
//!
//! This crate handles:
//! - Substituting `{{ name }}` task parameters into SQL text
//! - Rendering an annotated preview of a SQL file (original and replacement lines)

pub mod preview;
pub mod substitute;

pub use preview::{render_preview, render_preview_file, PreviewOptions, ORIGINAL_PREFIX, REPLACEMENT_SUFFIX};
pub use substitute::{has_placeholder, placeholder_names, substitute, TemplateError};
