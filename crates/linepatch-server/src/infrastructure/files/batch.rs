//! Applying a batch of modification tasks, one rewrite per file.
//!
//! Tasks are grouped by sanitised file path and files are processed in the
//! order their first task appears.  For each file:
//!
//! 1. All lines are read into memory.
//! 2. Every task whose line number lies in `1..=line_count` rewrites its line
//!    with [`build_new_line`]; tasks on the same line chain in the order they
//!    were received.  Out-of-range tasks are skipped.
//! 3. If at least one task applied, the file is rewritten from scratch with
//!    `\n` after every line.  Otherwise it is left untouched, byte for byte.
//!
//! Lines are handled as raw bytes, so files in encodings other than UTF-8
//! are patched without touching their other content.
//!
//! The first file that fails stops the batch.  Files rewritten before it keep
//! their changes; there is no rollback.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use linepatch_core::{build_new_line, sanitize_path, ModificationTask};
use tracing::{debug, info};

use super::read_lines;
use crate::application::apply_changes::{BatchSummary, ModificationSink, PatchError};

/// Rewrites files on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchApplier;

/// Per-file counters.
struct FileOutcome {
    applied: usize,
    skipped: usize,
}

impl BatchApplier {
    pub fn new() -> Self {
        Self
    }

    /// Applies `tasks`; see the module docs for the exact semantics.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::File`] for the first file that cannot be read or
    /// written.
    pub fn apply(&self, tasks: &[ModificationTask]) -> Result<BatchSummary, PatchError> {
        let mut summary = BatchSummary::default();

        for (path, file_tasks) in group_by_file(tasks) {
            let outcome = patch_file(&path, &file_tasks)?;
            summary.tasks_applied += outcome.applied;
            summary.tasks_skipped += outcome.skipped;
            if outcome.applied > 0 {
                summary.files_rewritten += 1;
            }
        }

        info!(
            "batch done: {} files rewritten, {} tasks applied, {} skipped",
            summary.files_rewritten, summary.tasks_applied, summary.tasks_skipped
        );
        Ok(summary)
    }
}

impl ModificationSink for BatchApplier {
    fn apply(&self, tasks: &[ModificationTask]) -> Result<BatchSummary, PatchError> {
        BatchApplier::apply(self, tasks)
    }
}

/// Groups tasks by sanitised path, keeping first-appearance order of files
/// and received order of tasks within a file.
fn group_by_file(tasks: &[ModificationTask]) -> Vec<(PathBuf, Vec<&ModificationTask>)> {
    let mut groups: Vec<(PathBuf, Vec<&ModificationTask>)> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for task in tasks {
        let path = sanitize_path(&task.target.file_path);
        match index.get(&path) {
            Some(&i) => groups[i].1.push(task),
            None => {
                index.insert(path.clone(), groups.len());
                groups.push((path, vec![task]));
            }
        }
    }
    groups
}

fn patch_file(path: &Path, tasks: &[&ModificationTask]) -> Result<FileOutcome, PatchError> {
    let file_err = |source: std::io::Error| PatchError::File {
        path: path.to_path_buf(),
        source,
    };

    let mut lines = read_lines(path).map_err(file_err)?;
    let line_count = lines.len();
    let mut outcome = FileOutcome {
        applied: 0,
        skipped: 0,
    };

    for task in tasks {
        let target = &task.target;
        let Some(line) = target
            .line_number
            .checked_sub(1)
            .and_then(|index| lines.get_mut(index))
        else {
            debug!(
                "skipping {} line {}: file has {} lines",
                path.display(),
                target.line_number,
                line_count
            );
            outcome.skipped += 1;
            continue;
        };
        *line = build_new_line(&*line, &target.prefix, &target.suffix, &task.new_value);
        outcome.applied += 1;
    }

    if outcome.applied == 0 {
        debug!("no applicable tasks for {}, left unchanged", path.display());
        return Ok(outcome);
    }

    let mut content = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in &lines {
        content.extend_from_slice(line);
        content.push(b'\n');
    }
    std::fs::write(path, content).map_err(file_err)?;

    debug!(
        "rewrote {} ({} tasks applied)",
        path.display(),
        outcome.applied
    );
    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
