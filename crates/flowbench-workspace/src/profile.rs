//! Connection profiles (~/.databrickscfg)
//!
//! The profile file is INI shaped:
//!
//! ```text
//! [DEFAULT]
//! host = https://adb-123.azuredatabricks.net
//!
//! [default-na]
//! token = dapi...
//! ```
//!
//! Keys missing from a named section fall back to `[DEFAULT]`.

use crate::error::WorkspaceError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_SECTION: &str = "DEFAULT";

/// A named connection profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub host: String,
    pub token: String,
}

impl Profile {
    /// Default profile file: $DATABRICKS_CONFIG_FILE, then ~/.databrickscfg
    pub fn default_path() -> Result<PathBuf, WorkspaceError> {
        if let Some(path) = std::env::var_os("DATABRICKS_CONFIG_FILE") {
            return Ok(PathBuf::from(path));
        }
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".databrickscfg"))
            .ok_or(WorkspaceError::NoHomeDirectory)
    }

    /// Load a named profile from a profile file
    pub fn load(path: &Path, name: &str) -> Result<Self, WorkspaceError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WorkspaceError::ProfileIo(path.display().to_string(), e.to_string()))?;

        Self::parse(&contents, name).map_err(|e| match e {
            WorkspaceError::ProfileNotFound { profile, .. } => WorkspaceError::ProfileNotFound {
                profile,
                path: path.display().to_string(),
            },
            other => other,
        })
    }

    /// Parse a named profile from profile file contents
    pub fn parse(contents: &str, name: &str) -> Result<Self, WorkspaceError> {
        let sections = parse_sections(contents);

        let Some(section) = sections.get(name) else {
            return Err(WorkspaceError::ProfileNotFound {
                profile: name.to_string(),
                path: "<memory>".to_string(),
            });
        };
        let defaults = sections.get(DEFAULT_SECTION);

        let lookup = |key: &str| -> Result<String, WorkspaceError> {
            section
                .get(key)
                .or_else(|| defaults.and_then(|d| d.get(key)))
                .cloned()
                .ok_or_else(|| WorkspaceError::MissingProfileKey {
                    profile: name.to_string(),
                    key: key.to_string(),
                })
        };

        Ok(Self {
            name: name.to_string(),
            host: lookup("host")?.trim_end_matches('/').to_string(),
            token: lookup("token")?,
        })
    }
}

fn parse_sections(contents: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let header = header.trim().to_string();
            sections.entry(header.clone()).or_default();
            current = Some(header);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if let Some(section) = &current {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROFILES: &str = "\
; shared settings
[DEFAULT]
host = https://adb-1.azuredatabricks.net/

[default-na]
token = dapi-na

[reporting]
host = https://adb-2.azuredatabricks.net
token = dapi-reporting
";

    #[test]
    fn named_profile() {
        let profile = Profile::parse(PROFILES, "reporting").unwrap();
        assert_eq!(profile.host, "https://adb-2.azuredatabricks.net");
        assert_eq!(profile.token, "dapi-reporting");
    }

    #[test]
    fn falls_back_to_default_section() {
        let profile = Profile::parse(PROFILES, "default-na").unwrap();
        assert_eq!(profile.host, "https://adb-1.azuredatabricks.net");
        assert_eq!(profile.token, "dapi-na");
    }

    #[test]
    fn missing_profile() {
        let err = Profile::parse(PROFILES, "prod").unwrap_err();
        assert!(matches!(err, WorkspaceError::ProfileNotFound { .. }));
    }

    #[test]
    fn missing_token() {
        let err = Profile::parse("[x]\nhost = https://h\n", "x").unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::MissingProfileKey { ref key, .. } if key == "token"
        ));
    }

    #[test]
    fn load_reports_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".databrickscfg");
        std::fs::write(&path, PROFILES).unwrap();

        assert_eq!(Profile::load(&path, "reporting").unwrap().token, "dapi-reporting");

        match Profile::load(&path, "missing").unwrap_err() {
            WorkspaceError::ProfileNotFound { path: reported, .. } => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
