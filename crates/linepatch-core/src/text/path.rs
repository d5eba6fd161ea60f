//! Sanitisation of user-supplied file paths.
//!
//! Paths typed into the UI are often copy-pasted from editors, chat clients or
//! file managers and can carry invisible characters: zero-width spaces,
//! left-to-right marks, bidirectional overrides, a stray BOM or a trailing
//! newline.  Such a path looks right on screen but names a different file, so
//! every path is passed through [`sanitize_path`] before any file system call.
//!
//! Normalisation is purely lexical: symbolic links are not resolved and the
//! file does not need to exist.

use std::path::{Component, Path, PathBuf};

/// Returns `true` for characters that are stripped from paths.
fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{200B}'..='\u{200F}' // zero-width space/joiners, LRM, RLM
                | '\u{202A}'..='\u{202E}' // embeddings and overrides
                | '\u{2066}'..='\u{2069}' // isolates
                | '\u{FEFF}'
        )
}

/// Strips invisible characters, trims whitespace and lexically normalises
/// `raw`.
///
/// - `.` segments are removed.
/// - `..` removes the preceding normal segment; at a root it is dropped; at
///   the start of a relative path it is kept.
/// - An empty result becomes `.`.
///
/// # Example
///
/// ```rust
/// use std::path::PathBuf;
/// use linepatch_core::text::path::sanitize_path;
///
/// assert_eq!(
///     sanitize_path(" /etc/\u{202E}app/./../app/app.conf\n"),
///     PathBuf::from("/etc/app/app.conf"),
/// );
/// ```
pub fn sanitize_path(raw: &str) -> PathBuf {
    let visible: String = raw.chars().filter(|c| !is_invisible(*c)).collect();
    normalize_lexically(Path::new(visible.trim()))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_unchanged() {
        assert_eq!(sanitize_path("/etc/app.conf"), PathBuf::from("/etc/app.conf"));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(sanitize_path("  conf/app.ini \t"), PathBuf::from("conf/app.ini"));
    }

    #[test]
    fn test_zero_width_space_between_segments_is_removed() {
        // Arrange: U+200B hidden between two segments
        let raw = "/srv/\u{200B}app/config.yml";

        // Act
        let cleaned = sanitize_path(raw);

        // Assert
        assert_eq!(cleaned, sanitize_path("/srv/app/config.yml"));
    }

    #[test]
    fn test_bidi_override_characters_are_removed() {
        let raw = "\u{202A}/srv/\u{202E}app\u{202C}/config.yml\u{2066}";
        assert_eq!(sanitize_path(raw), PathBuf::from("/srv/app/config.yml"));
    }

    #[test]
    fn test_control_characters_and_bom_are_removed() {
        let raw = "\u{FEFF}/srv/app\r\n/config.yml\u{0007}";
        assert_eq!(sanitize_path(raw), PathBuf::from("/srv/app/config.yml"));
    }

    #[test]
    fn test_dot_segments_are_resolved() {
        assert_eq!(
            sanitize_path("/srv/./app/../app/conf/./x.conf"),
            PathBuf::from("/srv/app/conf/x.conf")
        );
    }

    #[test]
    fn test_parent_of_root_stays_at_root() {
        assert_eq!(sanitize_path("/../etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_leading_parent_segments_of_relative_path_are_kept() {
        assert_eq!(sanitize_path("../../a/b/../c"), PathBuf::from("../../a/c"));
    }

    #[test]
    fn test_empty_and_dot_paths_become_current_dir() {
        assert_eq!(sanitize_path(""), PathBuf::from("."));
        assert_eq!(sanitize_path(" \u{200B} "), PathBuf::from("."));
        assert_eq!(sanitize_path("a/.."), PathBuf::from("."));
    }

    #[test]
    fn test_duplicate_separators_are_collapsed() {
        assert_eq!(sanitize_path("/srv//app///x"), PathBuf::from("/srv/app/x"));
    }
}
