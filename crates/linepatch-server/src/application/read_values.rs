//! Reading current values for a template.
//!
//! Two use cases share the [`TargetReader`] port:
//!
//! - [`fill_current_values`] serves the "open a template" request: each item
//!   shows the value found at its *first* target.  A target that cannot be
//!   read shows an empty value; the template still opens.
//! - [`check_template_status`] inspects *every* target of every item and
//!   reports, per target, either the value or the reason it cannot be used.

use std::path::PathBuf;

use linepatch_core::{ConfigItem, FileTarget, TargetIssue, Template};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for single-target reads.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target's line number is `0` or past the end of the file.
    #[error("line {line_number} not found in {} (file has {line_count} lines)", path.display())]
    LineOutOfRange {
        path: PathBuf,
        line_number: usize,
        line_count: usize,
    },
}

/// Reads values from the files a target points at.
#[cfg_attr(test, mockall::automock)]
pub trait TargetReader: Send + Sync {
    /// Returns the trimmed value at `target`.  A line without the prefix
    /// yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError`] when the file cannot be read or the line does
    /// not exist.
    fn read_value(&self, target: &FileTarget) -> Result<String, LocateError>;

    /// Like [`TargetReader::read_value`] but classifies every failure,
    /// including a missing prefix, as a [`TargetIssue`].
    fn inspect(&self, target: &FileTarget) -> Result<String, TargetIssue>;
}

/// Populates `current_value` of every item that has at least one target from
/// the item's first target.  Read failures produce an empty value.
pub fn fill_current_values(template: &mut Template, reader: &dyn TargetReader) {
    for item in &mut template.items {
        let Some(first) = item.targets.first() else {
            continue;
        };
        let value = match reader.read_value(first) {
            Ok(value) => value,
            Err(e) => {
                warn!("could not read current value of '{}': {e}", item.name);
                String::new()
            }
        };
        item.current_value = Some(value);
    }
}

// ── Template status ───────────────────────────────────────────────────────────

/// Outcome of a status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    Ok,
    Error,
}

/// Status of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatus {
    pub target_id: String,
    pub file_path: String,
    pub line_number: usize,
    pub status: StatusKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
}

/// Status of one item: `Ok` only when every target is readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatus {
    pub item_id: String,
    pub name: String,
    pub status: StatusKind,
    /// Value of the first readable target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub targets: Vec<TargetStatus>,
}

/// Status of every item in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStatus {
    pub template_id: String,
    pub name: String,
    pub items: Vec<ItemStatus>,
}

impl TemplateStatus {
    /// Number of items in the `Error` state.
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == StatusKind::Error)
            .count()
    }
}

/// Inspects every target of every item in `template`.
pub fn check_template_status(template: &Template, reader: &dyn TargetReader) -> TemplateStatus {
    let items: Vec<ItemStatus> = template
        .items
        .iter()
        .map(|item| check_item(item, reader))
        .collect();

    let status = TemplateStatus {
        template_id: template.id.clone(),
        name: template.name.clone(),
        items,
    };
    debug!(
        "status of template '{}': {} items, {} with errors",
        status.name,
        status.items.len(),
        status.error_count()
    );
    status
}

fn check_item(item: &ConfigItem, reader: &dyn TargetReader) -> ItemStatus {
    if item.targets.is_empty() {
        return ItemStatus {
            item_id: item.id.clone(),
            name: item.name.clone(),
            status: StatusKind::Error,
            current_value: None,
            message: Some("no file targets configured".to_string()),
            targets: Vec::new(),
        };
    }

    let targets: Vec<TargetStatus> = item
        .targets
        .iter()
        .map(|target| match reader.inspect(target) {
            Ok(value) => TargetStatus {
                target_id: target.id.clone(),
                file_path: target.file_path.clone(),
                line_number: target.line_number,
                status: StatusKind::Ok,
                message: "ok".to_string(),
                current_value: Some(value),
            },
            Err(issue) => TargetStatus {
                target_id: target.id.clone(),
                file_path: target.file_path.clone(),
                line_number: target.line_number,
                status: StatusKind::Error,
                message: issue.to_string(),
                current_value: None,
            },
        })
        .collect();

    let current_value = targets.iter().find_map(|t| t.current_value.clone());
    let errors: Vec<&str> = targets
        .iter()
        .filter(|t| t.status == StatusKind::Error)
        .map(|t| t.message.as_str())
        .collect();

    let (status, message) = if errors.is_empty() {
        (StatusKind::Ok, None)
    } else {
        (
            StatusKind::Error,
            Some(format!("some targets failed: {}", errors.join("; "))),
        )
    };

    ItemStatus {
        item_id: item.id.clone(),
        name: item.name.clone(),
        status,
        current_value,
        message,
        targets,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;

    fn item(name: &str, targets: Vec<FileTarget>) -> ConfigItem {
        ConfigItem {
            id: format!("{name}-id"),
            name: name.to_string(),
            targets,
            ..ConfigItem::default()
        }
    }

    fn template(items: Vec<ConfigItem>) -> Template {
        Template {
            id: "tpl".to_string(),
            name: "service".to_string(),
            items,
            ..Template::default()
        }
    }

    // ── fill_current_values ───────────────────────────────────────────────────

    #[test]
    fn test_fill_current_values_reads_first_target_only() {
        // Arrange
        let mut reader = MockTargetReader::new();
        reader
            .expect_read_value()
            .withf(|t| t.file_path == "first.conf")
            .times(1)
            .returning(|_| Ok("42".to_string()));
        let mut tpl = template(vec![item(
            "port",
            vec![
                FileTarget::new("first.conf", 1, "port=", ""),
                FileTarget::new("second.conf", 1, "port=", ""),
            ],
        )]);

        // Act
        fill_current_values(&mut tpl, &reader);

        // Assert
        assert_eq!(tpl.items[0].current_value.as_deref(), Some("42"));
    }

    #[test]
    fn test_fill_current_values_uses_empty_value_on_read_failure() {
        let mut reader = MockTargetReader::new();
        reader.expect_read_value().returning(|t| {
            Err(LocateError::FileNotFound {
                path: PathBuf::from(&t.file_path),
            })
        });
        let mut tpl = template(vec![item("host", vec![FileTarget::new("gone", 1, "h=", "")])]);

        fill_current_values(&mut tpl, &reader);

        assert_eq!(tpl.items[0].current_value.as_deref(), Some(""));
    }

    #[test]
    fn test_fill_current_values_skips_items_without_targets() {
        let mut reader = MockTargetReader::new();
        reader.expect_read_value().never();
        let mut tpl = template(vec![item("orphan", Vec::new())]);

        fill_current_values(&mut tpl, &reader);

        assert_eq!(tpl.items[0].current_value, None);
    }

    // ── check_template_status ─────────────────────────────────────────────────

    #[test]
    fn test_status_ok_when_every_target_reads() {
        let mut reader = MockTargetReader::new();
        reader
            .expect_inspect()
            .with(always())
            .returning(|_| Ok("on".to_string()));
        let tpl = template(vec![item(
            "flag",
            vec![
                FileTarget::new("a", 1, "f=", ""),
                FileTarget::new("b", 1, "f=", ""),
            ],
        )]);

        let status = check_template_status(&tpl, &reader);

        assert_eq!(status.error_count(), 0);
        assert_eq!(status.items[0].status, StatusKind::Ok);
        assert_eq!(status.items[0].current_value.as_deref(), Some("on"));
        assert_eq!(status.items[0].targets.len(), 2);
    }

    #[test]
    fn test_status_error_when_any_target_fails() {
        // Arrange: the second target's file is missing
        let mut reader = MockTargetReader::new();
        reader.expect_inspect().returning(|t| {
            if t.file_path == "missing.conf" {
                Err(TargetIssue::FileNotFound {
                    path: t.file_path.clone(),
                })
            } else {
                Ok("1".to_string())
            }
        });
        let tpl = template(vec![item(
            "level",
            vec![
                FileTarget::new("present.conf", 1, "l=", ""),
                FileTarget::new("missing.conf", 1, "l=", ""),
            ],
        )]);

        // Act
        let status = check_template_status(&tpl, &reader);

        // Assert
        let item = &status.items[0];
        assert_eq!(item.status, StatusKind::Error);
        assert_eq!(item.current_value.as_deref(), Some("1"));
        assert!(item.message.as_deref().unwrap_or_default().contains("missing.conf"));
        assert_eq!(item.targets[1].status, StatusKind::Error);
    }

    #[test]
    fn test_status_error_for_item_without_targets() {
        let reader = MockTargetReader::new();
        let tpl = template(vec![item("empty", Vec::new())]);

        let status = check_template_status(&tpl, &reader);

        assert_eq!(status.items[0].status, StatusKind::Error);
        assert_eq!(status.error_count(), 1);
    }

    #[test]
    fn test_status_serializes_kind_in_upper_case() {
        let reader = MockTargetReader::new();
        let status = check_template_status(&template(vec![item("x", Vec::new())]), &reader);

        let json = serde_json::to_value(&status).expect("serialize");

        assert_eq!(json["items"][0]["status"], "ERROR");
        assert_eq!(json["templateId"], "tpl");
    }
}
