//! Reading values and searching lines in target files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use linepatch_core::{extract_value, inspect_lines, line_matches, sanitize_path};
use linepatch_core::{FileTarget, MatchResult, TargetIssue};
use tracing::debug;

use super::read_lines;
use crate::application::read_values::{LocateError, TargetReader};

/// Stateless reader over the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLocator;

impl FileLocator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the trimmed value at `target`.  A line that lacks the prefix
    /// yields an empty string.
    ///
    /// # Errors
    ///
    /// - [`LocateError::FileNotFound`] when the file does not exist.
    /// - [`LocateError::Io`] when it cannot be opened or read.
    /// - [`LocateError::LineOutOfRange`] when the line number is `0` or past
    ///   the last line.
    pub fn get_value(&self, target: &FileTarget) -> Result<String, LocateError> {
        let path = sanitize_path(&target.file_path);
        let lines = load(&path)?;
        let line = target
            .line_number
            .checked_sub(1)
            .and_then(|index| lines.get(index))
            .ok_or_else(|| LocateError::LineOutOfRange {
                path: path.clone(),
                line_number: target.line_number,
                line_count: lines.len(),
            })?;
        Ok(extract_value(line, &target.prefix, &target.suffix))
    }

    /// Lists every line of `file_path` that contains `prefix` and, when
    /// `suffix` is non-empty, also contains `suffix` somewhere in the line.
    ///
    /// The suffix test is positional only when reading or patching a value;
    /// here it may appear anywhere, even before the prefix.
    ///
    /// # Errors
    ///
    /// [`LocateError::FileNotFound`] or [`LocateError::Io`].
    pub fn find_matches(
        &self,
        file_path: &str,
        prefix: &str,
        suffix: &str,
    ) -> Result<Vec<MatchResult>, LocateError> {
        let path = sanitize_path(file_path);
        let matches: Vec<MatchResult> = load(&path)?
            .into_iter()
            .enumerate()
            .filter(|(_, line)| line_matches(line, prefix, suffix))
            .map(|(index, line)| MatchResult {
                line_number: index + 1,
                line_content: String::from_utf8_lossy(&line).into_owned(),
            })
            .collect();
        debug!(
            "{} lines of {} match prefix '{prefix}'",
            matches.len(),
            path.display()
        );
        Ok(matches)
    }

    /// Like [`FileLocator::get_value`] but classifies every failure as a
    /// [`TargetIssue`], including a line that does not contain the prefix.
    pub fn inspect(&self, target: &FileTarget) -> Result<String, TargetIssue> {
        let path = sanitize_path(&target.file_path);
        let shown = path.display().to_string();
        let lines = read_lines(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TargetIssue::FileNotFound {
                path: shown.clone(),
            },
            _ => TargetIssue::FileNotReadable {
                path: shown.clone(),
                reason: e.to_string(),
            },
        })?;
        inspect_lines(&shown, &lines, target)
    }
}

fn load(path: &Path) -> Result<Vec<Vec<u8>>, LocateError> {
    read_lines(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LocateError::FileNotFound {
            path: PathBuf::from(path),
        },
        _ => LocateError::Io {
            path: PathBuf::from(path),
            source,
        },
    })
}

impl TargetReader for FileLocator {
    fn read_value(&self, target: &FileTarget) -> Result<String, LocateError> {
        self.get_value(target)
    }

    fn inspect(&self, target: &FileTarget) -> Result<String, TargetIssue> {
        FileLocator::inspect(self, target)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
