//! `{{ name }}` placeholder substitution

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Opening marker of a task parameter reference
pub const MARKER_OPEN: &str = "{{";

const MARKER_CLOSE: &str = "}}";

/// Template errors
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Unresolved placeholder '{{{{{name}}}}}' on line {line}")]
    UnresolvedPlaceholder { name: String, line: usize },

    #[error("Invalid placeholder pattern: {0}")]
    Pattern(String),

    #[error("Failed to read SQL file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn placeholder_regex() -> Result<&'static Regex, TemplateError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}"))
        .as_ref()
        .map_err(|e| TemplateError::Pattern(e.to_string()))
}

/// Check if a line references a task parameter
pub fn has_placeholder(text: &str) -> bool {
    text.contains(MARKER_OPEN)
}

/// Names referenced by `{{ name }}` markers, in order of appearance
pub fn placeholder_names(text: &str) -> Result<Vec<String>, TemplateError> {
    Ok(placeholder_regex()?
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect())
}

/// Content of the first `{{` that does not open a well-formed marker
fn malformed_marker(text: &str, regex: &Regex) -> Option<String> {
    let mut gaps = Vec::new();
    let mut last = 0;
    for found in regex.find_iter(text) {
        gaps.push(&text[last..found.start()]);
        last = found.end();
    }
    gaps.push(&text[last..]);

    gaps.into_iter().find_map(|gap| {
        let start = gap.find(MARKER_OPEN)?;
        let rest = &gap[start + MARKER_OPEN.len()..];
        let inner = rest.split_once(MARKER_CLOSE).map_or(rest, |(inner, _)| inner);
        Some(inner.trim().to_string())
    })
}

/// Replace every `{{ name }}` marker in `text` with its parameter value
///
/// A name without a parameter, or a `{{` that does not form a marker, is
/// a [`TemplateError::UnresolvedPlaceholder`]. `line` is only used for
/// error reporting.
pub fn substitute(
    text: &str,
    params: &BTreeMap<String, String>,
    line: usize,
) -> Result<String, TemplateError> {
    let regex = placeholder_regex()?;

    if let Some(name) = malformed_marker(text, regex) {
        return Err(TemplateError::UnresolvedPlaceholder { name, line });
    }

    if let Some(missing) = regex
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .find(|name| !params.contains_key(name))
    {
        return Err(TemplateError::UnresolvedPlaceholder { name: missing, line });
    }

    let replaced = regex.replace_all(text, |caps: &Captures| {
        params.get(&caps[1]).cloned().unwrap_or_default()
    });

    Ok(replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_markers() {
        let p = params(&[("catalog_prefix", "rpt_"), ("schema_prefix", "p_burridge_")]);
        let out = substitute("{{catalog_prefix}}raw.{{ schema_prefix }}orders", &p, 1).unwrap();
        assert_eq!(out, "rpt_raw.p_burridge_orders");
    }

    #[test]
    fn unresolved_names_the_parameter() {
        let p = params(&[("catalog_prefix", "rpt_")]);
        match substitute("FROM {{catalog_prefix}}.{{ env }}.orders", &p, 12).unwrap_err() {
            TemplateError::UnresolvedPlaceholder { name, line } => {
                assert_eq!(name, "env");
                assert_eq!(line, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let text = "SELECT '{not a marker}' AS x";
        assert_eq!(substitute(text, &BTreeMap::new(), 1).unwrap(), text);
        assert!(!has_placeholder(text));
    }

    #[test]
    fn collects_names_in_order() {
        assert_eq!(
            placeholder_names("{{b}} {{ a }} {{b}}").unwrap(),
            vec!["b".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn hyphenated_names_are_replaced() {
        let p = params(&[("output-schema", "x_reporting")]);
        let out = substitute("SELECT * FROM {{output-schema}}.t", &p, 1).unwrap();
        assert_eq!(out, "SELECT * FROM x_reporting.t");
    }

    #[test]
    fn hyphenated_name_without_parameter_is_unresolved() {
        match substitute("SELECT * FROM {{ output-schema }}.t", &BTreeMap::new(), 4).unwrap_err() {
            TemplateError::UnresolvedPlaceholder { name, line } => {
                assert_eq!(name, "output-schema");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_markers_are_unresolved() {
        let p = params(&[("a", "1")]);
        for (text, expected) in [
            ("{{a}} AND {{ }}", ""),
            ("{{a b}}", "a b"),
            ("WHERE x = {{a", "a"),
        ] {
            match substitute(text, &p, 1).unwrap_err() {
                TemplateError::UnresolvedPlaceholder { name, .. } => assert_eq!(name, expected, "{text}"),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
