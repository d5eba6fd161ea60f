//! Turning user-submitted values into patch batches.
//!
//! The UI submits a map from item key (item id or item name) to new value.
//! Each named item expands into one [`ModificationTask`] per target, in
//! template order, and the resulting batch is handed to a
//! [`ModificationSink`] which groups it per file and rewrites each file once.
//!
//! [`precheck`] runs the same expansion without writing anything and reports
//! every target that would not patch cleanly.

use std::collections::BTreeMap;
use std::path::PathBuf;

use linepatch_core::{ConfigItem, ModificationTask, TargetIssue, Template};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::read_values::TargetReader;

/// Error type for batch rewrites.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Reading or rewriting a file failed.  Files processed before this one
    /// keep their changes.
    #[error("failed to process file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counters describing a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub files_rewritten: usize,
    pub tasks_applied: usize,
    /// Tasks whose line number was outside the file.
    pub tasks_skipped: usize,
}

/// Applies a batch of modification tasks.
#[cfg_attr(test, mockall::automock)]
pub trait ModificationSink: Send + Sync {
    /// Applies `tasks`, rewriting each affected file once.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatchError`]; files rewritten before it stay
    /// modified.
    fn apply(&self, tasks: &[ModificationTask]) -> Result<BatchSummary, PatchError>;
}

/// Tasks expanded from a value map, plus the keys that named no item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationPlan {
    pub tasks: Vec<ModificationTask>,
    pub unknown_keys: Vec<String>,
}

/// Expands `values` into one task per target of every named item.
///
/// Items are visited in template order.  A value keyed by the item's id wins
/// over one keyed by its name.
pub fn plan_modifications(template: &Template, values: &BTreeMap<String, String>) -> ModificationPlan {
    let tasks = valued_items(template, values)
        .flat_map(|(item, value)| {
            item.targets.iter().map(move |target| ModificationTask {
                target: target.clone(),
                new_value: value.clone(),
            })
        })
        .collect();

    let unknown_keys: Vec<String> = values
        .keys()
        .filter(|key| template.item_by_key(key).is_none())
        .cloned()
        .collect();
    for key in &unknown_keys {
        warn!("template '{}' has no item '{key}'", template.name);
    }

    ModificationPlan {
        tasks,
        unknown_keys,
    }
}

/// Pairs every item named in `values` with its new value.
fn valued_items<'a>(
    template: &'a Template,
    values: &'a BTreeMap<String, String>,
) -> impl Iterator<Item = (&'a ConfigItem, &'a String)> + 'a {
    template.items.iter().filter_map(move |item| {
        let by_id = (!item.id.is_empty()).then(|| values.get(&item.id)).flatten();
        by_id.or_else(|| values.get(&item.name)).map(|value| (item, value))
    })
}

// ── Pre-check ─────────────────────────────────────────────────────────────────

/// One target that would not patch cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreCheckIssue {
    pub item_name: String,
    pub issue: TargetIssue,
    pub description: String,
    pub suggestion: &'static str,
}

/// Result of checking every target a value map would touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreCheckReport {
    pub total_targets: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub issues: Vec<PreCheckIssue>,
    pub unknown_items: Vec<String>,
}

impl PreCheckReport {
    /// `true` when every target can be patched.
    pub fn is_clean(&self) -> bool {
        self.invalid_count == 0
    }
}

/// Inspects every target that applying `values` would touch.
pub fn precheck(
    template: &Template,
    values: &BTreeMap<String, String>,
    reader: &dyn TargetReader,
) -> PreCheckReport {
    let mut report = PreCheckReport {
        unknown_items: plan_modifications(template, values).unknown_keys,
        ..PreCheckReport::default()
    };

    for (item, _) in valued_items(template, values) {
        for target in &item.targets {
            match reader.inspect(target) {
                Ok(_) => report.valid_count += 1,
                Err(issue) => {
                    report.issues.push(PreCheckIssue {
                        item_name: item.name.clone(),
                        description: issue.to_string(),
                        suggestion: issue.suggestion(),
                        issue,
                    });
                    report.invalid_count += 1;
                }
            }
        }
    }
    report.total_targets = report.valid_count + report.invalid_count;

    info!(
        "pre-check of template '{}': {} targets, {} valid, {} with issues",
        template.name, report.total_targets, report.valid_count, report.invalid_count
    );
    report
}

// ── Apply ─────────────────────────────────────────────────────────────────────

/// Result of applying a value map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    #[serde(flatten)]
    pub summary: BatchSummary,
    pub unknown_items: Vec<String>,
}

/// Expands `values` and applies the batch through `sink`.
///
/// # Errors
///
/// Propagates the sink's [`PatchError`].
pub fn apply_values(
    template: &Template,
    values: &BTreeMap<String, String>,
    sink: &dyn ModificationSink,
) -> Result<ApplyOutcome, PatchError> {
    let plan = plan_modifications(template, values);
    let summary = sink.apply(&plan.tasks)?;
    Ok(ApplyOutcome {
        summary,
        unknown_items: plan.unknown_keys,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_values::MockTargetReader;
    use linepatch_core::FileTarget;

    fn template() -> Template {
        Template {
            id: "tpl".to_string(),
            name: "web".to_string(),
            description: String::new(),
            items: vec![
                ConfigItem {
                    id: "item-port".to_string(),
                    name: "port".to_string(),
                    targets: vec![
                        FileTarget::new("a.conf", 1, "port=", ";"),
                        FileTarget::new("b.conf", 4, "PORT ", ""),
                    ],
                    ..ConfigItem::default()
                },
                ConfigItem {
                    id: "item-host".to_string(),
                    name: "host".to_string(),
                    targets: vec![FileTarget::new("a.conf", 2, "host=", ";")],
                    ..ConfigItem::default()
                },
            ],
        }
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── plan_modifications ────────────────────────────────────────────────────

    #[test]
    fn test_plan_emits_one_task_per_target_in_template_order() {
        // Arrange: keys in reverse order of the template
        let input = values(&[("host", "example.org"), ("port", "8443")]);

        // Act
        let plan = plan_modifications(&template(), &input);

        // Assert
        let files: Vec<(&str, &str)> = plan
            .tasks
            .iter()
            .map(|t| (t.target.file_path.as_str(), t.new_value.as_str()))
            .collect();
        assert_eq!(
            files,
            vec![("a.conf", "8443"), ("b.conf", "8443"), ("a.conf", "example.org")]
        );
        assert!(plan.unknown_keys.is_empty());
    }

    #[test]
    fn test_plan_accepts_item_id_and_prefers_it_over_name() {
        let input = values(&[("item-port", "1"), ("port", "2")]);

        let plan = plan_modifications(&template(), &input);

        assert_eq!(plan.tasks.len(), 2);
        assert!(plan.tasks.iter().all(|t| t.new_value == "1"));
    }

    #[test]
    fn test_plan_reports_unknown_keys() {
        let plan = plan_modifications(&template(), &values(&[("colour", "blue")]));
        assert!(plan.tasks.is_empty());
        assert_eq!(plan.unknown_keys, vec!["colour".to_string()]);
    }

    // ── precheck ──────────────────────────────────────────────────────────────

    #[test]
    fn test_precheck_counts_valid_and_invalid_targets() {
        // Arrange: b.conf has moved on and no longer has line 4
        let mut reader = MockTargetReader::new();
        reader.expect_inspect().returning(|t| {
            if t.file_path == "b.conf" {
                Err(TargetIssue::InvalidLineNumber {
                    path: t.file_path.clone(),
                    line_number: t.line_number,
                    line_count: 2,
                })
            } else {
                Ok("old".to_string())
            }
        });

        // Act
        let report = precheck(&template(), &values(&[("port", "9"), ("x", "y")]), &reader);

        // Assert
        assert_eq!(report.total_targets, 2);
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.invalid_count, 1);
        assert_eq!(report.valid_count + report.invalid_count, report.total_targets);
        assert!(!report.is_clean());
        assert_eq!(report.issues[0].item_name, "port");
        assert_eq!(report.unknown_items, vec!["x".to_string()]);
    }

    #[test]
    fn test_precheck_clean_when_all_targets_inspect() {
        let mut reader = MockTargetReader::new();
        reader.expect_inspect().times(3).returning(|_| Ok(String::new()));

        let report = precheck(&template(), &values(&[("port", "1"), ("host", "h")]), &reader);

        assert!(report.is_clean());
        assert_eq!(report.total_targets, 3);
    }

    // ── apply_values ──────────────────────────────────────────────────────────

    #[test]
    fn test_apply_values_sends_planned_tasks_to_sink() {
        // Arrange
        let mut sink = MockModificationSink::new();
        sink.expect_apply()
            .withf(|tasks| {
                tasks.len() == 1 && tasks[0].target.file_path == "a.conf"
            })
            .times(1)
            .returning(|tasks| {
                Ok(BatchSummary {
                    files_rewritten: 1,
                    tasks_applied: tasks.len(),
                    tasks_skipped: 0,
                })
            });

        // Act
        let outcome = apply_values(&template(), &values(&[("host", "h")]), &sink).expect("apply");

        // Assert
        assert_eq!(outcome.summary.tasks_applied, 1);
        assert!(outcome.unknown_items.is_empty());
    }

    #[test]
    fn test_apply_values_propagates_sink_error() {
        let mut sink = MockModificationSink::new();
        sink.expect_apply().returning(|_| {
            Err(PatchError::File {
                path: PathBuf::from("a.conf"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

        let result = apply_values(&template(), &values(&[("host", "h")]), &sink);

        assert!(matches!(result, Err(PatchError::File { .. })));
    }
}
