//! Annotated SQL preview
//!
//! Produces a copy of a SQL file that can be pasted into a notebook:
//! lines with task parameters are shown twice (commented original, then the
//! substituted replacement) and `CREATE OR REPLACE` lines are commented out so
//! the preview never mutates a schema.

use crate::substitute::{has_placeholder, substitute, TemplateError};
use std::collections::BTreeMap;
use std::path::Path;

/// Prefix of a commented-out input line
pub const ORIGINAL_PREFIX: &str = "-- [ORIGINAL] ";

/// Suffix of a substituted line
pub const REPLACEMENT_SUFFIX: &str = " -- [REPLACEMENT]";

const SCHEMA_MUTATION: &str = "CREATE OR REPLACE";
const NOTEBOOK_HEADER: &str = "%sql\n";

/// Preview rendering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Start the output with a `%sql` magic line
    pub notebook_header: bool,
}

/// Render a preview of `sql` with `params` substituted
pub fn render_preview(
    sql: &str,
    params: &BTreeMap<String, String>,
    options: PreviewOptions,
) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(sql.len() * 2);
    if options.notebook_header {
        output.push_str(NOTEBOOK_HEADER);
    }

    for (index, line) in sql.split_inclusive('\n').enumerate() {
        let body = line.trim_end_matches(['\n', '\r']);
        let ending = &line[body.len()..];

        if has_placeholder(body) {
            let replaced = substitute(body, params, index + 1)?;
            output.push_str(ORIGINAL_PREFIX);
            output.push_str(body);
            output.push_str(if ending.is_empty() { "\n" } else { ending });
            output.push_str(&replaced);
            output.push_str(REPLACEMENT_SUFFIX);
            output.push_str(ending);
        } else if body.contains(SCHEMA_MUTATION) {
            output.push_str(ORIGINAL_PREFIX);
            output.push_str(line);
        } else {
            output.push_str(line);
        }
    }

    Ok(output)
}

/// Read a SQL file and render its preview
pub fn render_preview_file(
    path: &Path,
    params: &BTreeMap<String, String>,
    options: PreviewOptions,
) -> Result<String, TemplateError> {
    let sql = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Rendering preview of {}", path.display());
    render_preview(&sql, params, options)
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
    fn templated_line_is_shown_twice() {
        let out = render_preview(
            "SELECT * FROM {{catalog_prefix}}.raw.orders",
            &params(&[("catalog_prefix", "rpt_")]),
            PreviewOptions::default(),
        )
        .unwrap();

        assert_eq!(
            out,
            "-- [ORIGINAL] SELECT * FROM {{catalog_prefix}}.raw.orders\n\
             SELECT * FROM rpt_.raw.orders -- [REPLACEMENT]"
        );
    }

    #[test]
    fn plain_sql_passes_through() {
        let sql = "SELECT id,\n       amount\nFROM orders\nWHERE amount > 0\n";
        let out = render_preview(sql, &BTreeMap::new(), PreviewOptions::default()).unwrap();
        assert_eq!(out, sql);
    }

    #[test]
    fn create_or_replace_is_commented_out() {
        let sql = "CREATE OR REPLACE TABLE t AS\nSELECT 1\n";
        let out = render_preview(sql, &BTreeMap::new(), PreviewOptions::default()).unwrap();
        assert_eq!(out, "-- [ORIGINAL] CREATE OR REPLACE TABLE t AS\nSELECT 1\n");
    }

    #[test]
    fn template_rule_wins_over_create_or_replace() {
        let sql = "CREATE OR REPLACE TABLE {{catalog}}.s.t AS\n";
        let out = render_preview(sql, &params(&[("catalog", "dev")]), PreviewOptions::default()).unwrap();
        assert_eq!(
            out,
            "-- [ORIGINAL] CREATE OR REPLACE TABLE {{catalog}}.s.t AS\n\
             CREATE OR REPLACE TABLE dev.s.t AS -- [REPLACEMENT]\n"
        );
    }

    #[test]
    fn notebook_header_and_crlf() {
        let sql = "SELECT {{x}}\r\nFROM t\r\n";
        let out = render_preview(
            sql,
            &params(&[("x", "1")]),
            PreviewOptions { notebook_header: true },
        )
        .unwrap();
        assert_eq!(
            out,
            "%sql\n-- [ORIGINAL] SELECT {{x}}\r\nSELECT 1 -- [REPLACEMENT]\r\nFROM t\r\n"
        );
    }

    #[test]
    fn unresolved_placeholder_reports_line() {
        let sql = "SELECT 1\nFROM {{missing}}.t\n";
        match render_preview(sql, &BTreeMap::new(), PreviewOptions::default()).unwrap_err() {
            TemplateError::UnresolvedPlaceholder { name, line } => {
                assert_eq!(name, "missing");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_input_line_maps_to_one_or_two_output_lines() {
        let sql = "a\n{{p}}\nCREATE OR REPLACE VIEW v\nb\n";
        let out = render_preview(sql, &params(&[("p", "q")]), PreviewOptions::default()).unwrap();
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn preview_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.sql");
        std::fs::write(&path, "SELECT * FROM {{ catalog_prefix }}.raw.orders\n").unwrap();

        let out = render_preview_file(&path, &params(&[("catalog_prefix", "rpt_")]), PreviewOptions::default())
            .unwrap();
        assert!(out.ends_with("SELECT * FROM rpt_.raw.orders -- [REPLACEMENT]\n"));

        let missing = render_preview_file(&dir.path().join("nope.sql"), &BTreeMap::new(), PreviewOptions::default());
        assert!(matches!(missing, Err(TemplateError::Io { .. })));
    }

    #[test]
    fn hyphenated_parameter_is_substituted() {
        let out = render_preview(
            "SELECT * FROM {{output-schema}}.t\n",
            &params(&[("output-schema", "x_reporting")]),
            PreviewOptions::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            "-- [ORIGINAL] SELECT * FROM {{output-schema}}.t\n\
             SELECT * FROM x_reporting.t -- [REPLACEMENT]\n"
        );
    }

    #[test]
    fn hyphenated_parameter_without_value_is_an_error() {
        let result = render_preview(
            "SELECT * FROM {{output-schema}}.t\n",
            &BTreeMap::new(),
            PreviewOptions::default(),
        );
        assert!(matches!(
            result,
            Err(TemplateError::UnresolvedPlaceholder { ref name, line: 1 }) if name == "output-schema"
        ));
    }
}
