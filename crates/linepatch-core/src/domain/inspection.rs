//! Classification of problems found when checking a [`FileTarget`] against
//! the current content of its file.
//!
//! The file-level issues ([`TargetIssue::FileNotFound`],
//! [`TargetIssue::FileNotReadable`]) are produced by whoever opens the file;
//! the line-level issues are decided here by [`inspect_lines`], which needs no
//! I/O and can be tested on plain string slices.

use serde::Serialize;
use thiserror::Error;

use super::template::FileTarget;
use crate::text::locate::{extract_value, line_matches};

/// Why a target cannot be read or patched as configured.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum TargetIssue {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("file not readable: {path} ({reason})")]
    FileNotReadable { path: String, reason: String },

    #[error("invalid line number: {path} line {line_number} (file has {line_count} lines)")]
    InvalidLineNumber {
        path: String,
        line_number: usize,
        line_count: usize,
    },

    #[error("prefix not found: {path} line {line_number} does not contain '{prefix}'")]
    PrefixNotFound {
        path: String,
        line_number: usize,
        prefix: String,
    },
}

impl TargetIssue {
    /// A short hint shown next to the issue in the UI.
    pub fn suggestion(&self) -> &'static str {
        match self {
            TargetIssue::FileNotFound { .. } => "check the file path or create the file",
            TargetIssue::FileNotReadable { .. } => "check that the path is a readable file",
            TargetIssue::InvalidLineNumber { .. } => {
                "check that the line number is within the file"
            }
            TargetIssue::PrefixNotFound { .. } => {
                "check the prefix or update the target to the current file layout"
            }
        }
    }

    /// The path the issue refers to.
    pub fn path(&self) -> &str {
        match self {
            TargetIssue::FileNotFound { path }
            | TargetIssue::FileNotReadable { path, .. }
            | TargetIssue::InvalidLineNumber { path, .. }
            | TargetIssue::PrefixNotFound { path, .. } => path,
        }
    }
}

/// Checks `target` against the already-read `lines` of the file at `path`
/// and returns the current value.
///
/// Stricter than a plain read: a line that does not contain the prefix is
/// reported as [`TargetIssue::PrefixNotFound`] instead of yielding an empty
/// value.
///
/// # Errors
///
/// Returns [`TargetIssue::InvalidLineNumber`] when the line number is `0` or
/// greater than `lines.len()`, and [`TargetIssue::PrefixNotFound`] when the
/// line lacks the prefix.
pub fn inspect_lines<S: AsRef<[u8]>>(
    path: &str,
    lines: &[S],
    target: &FileTarget,
) -> Result<String, TargetIssue> {
    let line: &[u8] = target
        .line_number
        .checked_sub(1)
        .and_then(|index| lines.get(index))
        .map(|line| line.as_ref())
        .ok_or_else(|| TargetIssue::InvalidLineNumber {
            path: path.to_string(),
            line_number: target.line_number,
            line_count: lines.len(),
        })?;

    if !line_matches(line, &target.prefix, "") {
        return Err(TargetIssue::PrefixNotFound {
            path: path.to_string(),
            line_number: target.line_number,
            prefix: target.prefix.clone(),
        });
    }

    Ok(extract_value(line, &target.prefix, &target.suffix))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: [&str; 3] = ["# header", "port=8080;", "host = example.org"];

    #[test]
    fn test_inspect_lines_returns_value() {
        let target = FileTarget::new("app.conf", 2, "port=", ";");
        assert_eq!(inspect_lines("app.conf", &LINES[..], &target), Ok("8080".to_string()));
    }

    #[test]
    fn test_inspect_lines_rejects_line_zero() {
        let target = FileTarget::new("app.conf", 0, "port=", ";");

        let result = inspect_lines("app.conf", &LINES[..], &target);

        assert_eq!(
            result,
            Err(TargetIssue::InvalidLineNumber {
                path: "app.conf".to_string(),
                line_number: 0,
                line_count: 3,
            })
        );
    }

    #[test]
    fn test_inspect_lines_rejects_line_past_end() {
        let target = FileTarget::new("app.conf", 4, "port=", "");
        assert!(matches!(
            inspect_lines("app.conf", &LINES[..], &target),
            Err(TargetIssue::InvalidLineNumber { line_count: 3, .. })
        ));
    }

    #[test]
    fn test_inspect_lines_reports_missing_prefix() {
        let target = FileTarget::new("app.conf", 3, "port=", "");
        assert!(matches!(
            inspect_lines("app.conf", &LINES[..], &target),
            Err(TargetIssue::PrefixNotFound { line_number: 3, .. })
        ));
    }

    #[test]
    fn test_inspect_lines_accepts_raw_byte_lines() {
        let lines: Vec<Vec<u8>> = vec![b"# \xd6\xd0\xce\xc4".to_vec(), b"port=8080;".to_vec()];
        let target = FileTarget::new("gbk.conf", 2, "port=", ";");

        assert_eq!(inspect_lines("gbk.conf", &lines, &target), Ok("8080".to_string()));
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let issue = TargetIssue::InvalidLineNumber {
            path: "a".to_string(),
            line_number: 9,
            line_count: 2,
        };

        let json = serde_json::to_value(&issue).expect("serialize");

        assert_eq!(json["kind"], "INVALID_LINE_NUMBER");
        assert_eq!(json["lineNumber"], 9);
        assert_eq!(json["lineCount"], 2);
    }

    #[test]
    fn test_issue_display_names_the_path() {
        let issue = TargetIssue::FileNotFound {
            path: "/srv/missing.conf".to_string(),
        };
        assert_eq!(issue.to_string(), "file not found: /srv/missing.conf");
        assert_eq!(issue.path(), "/srv/missing.conf");
    }
}
