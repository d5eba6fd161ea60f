//! Locating and rewriting a value inside a single line of text.
//!
//! A target describes its value with a prefix and an optional suffix:
//!
//! ```text
//! listen_port = 8080 ;  # comment
//! ^^^^^^^^^^^^^^      ^
//!    prefix     VALUE suffix
//! ```
//!
//! Reading ([`extract_value`]) and writing ([`build_new_line`]) agree on the
//! span: it starts right after the first occurrence of the prefix and ends at
//! the first occurrence of the suffix *after* that point, or at the end of the
//! line.  Searching ([`line_matches`]) is looser and only checks that both
//! delimiters occur somewhere in the line.  Candidate listing in the UI
//! depends on the looser check.
//!
//! Lines are raw bytes.  Config files are not required to be UTF-8, and
//! bytes outside the rewritten span are copied through untouched.  Anything
//! that can be passed as `&[u8]` (`&str`, `String`, `Vec<u8>`) is accepted.

use std::ops::Range;

/// Byte offset of the first occurrence of `needle` in `haystack`.  An empty
/// needle matches at `0`, like [`str::find`].
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Returns the byte range of the value in `line`, or `None` when the prefix
/// does not occur.
///
/// With an empty `suffix`, or when the suffix does not occur after the
/// prefix, the range runs to the end of the line.
pub fn value_span(
    line: impl AsRef<[u8]>,
    prefix: impl AsRef<[u8]>,
    suffix: impl AsRef<[u8]>,
) -> Option<Range<usize>> {
    let (line, prefix, suffix) = (line.as_ref(), prefix.as_ref(), suffix.as_ref());
    let start = find_bytes(line, prefix)? + prefix.len();
    if suffix.is_empty() {
        return Some(start..line.len());
    }
    let end = find_bytes(&line[start..], suffix).map_or(line.len(), |offset| start + offset);
    Some(start..end)
}

/// Extracts the trimmed value between `prefix` and `suffix`.
///
/// Returns an empty string when the prefix does not occur in the line.  Bytes
/// of the value that are not valid UTF-8 come back as U+FFFD.
///
/// # Example
///
/// ```rust
/// use linepatch_core::text::locate::extract_value;
///
/// assert_eq!(extract_value("foo=123;", "foo=", ";"), "123");
/// assert_eq!(extract_value("timeout 30 # comment", "timeout ", ""), "30 # comment");
/// ```
pub fn extract_value(
    line: impl AsRef<[u8]>,
    prefix: impl AsRef<[u8]>,
    suffix: impl AsRef<[u8]>,
) -> String {
    let line = line.as_ref();
    value_span(line, prefix, suffix)
        .map(|span| String::from_utf8_lossy(&line[span]).trim().to_string())
        .unwrap_or_default()
}

/// Builds the replacement for `old_line` with `new_value` written between the
/// delimiters.
///
/// - Empty `suffix`: the whole line becomes `prefix + new_value`; anything
///   before the prefix is discarded.
/// - Non-empty `suffix` and the prefix is missing: the line is returned
///   unchanged.  This is never an error.
/// - Non-empty `suffix` and the prefix is found: text before the prefix is
///   kept, then `prefix + new_value`, then the first suffix after the prefix
///   and everything after it.  When that suffix is missing the line ends at
///   the new value.
pub fn build_new_line(
    old_line: impl AsRef<[u8]>,
    prefix: impl AsRef<[u8]>,
    suffix: impl AsRef<[u8]>,
    new_value: impl AsRef<[u8]>,
) -> Vec<u8> {
    let (old_line, prefix, suffix, new_value) = (
        old_line.as_ref(),
        prefix.as_ref(),
        suffix.as_ref(),
        new_value.as_ref(),
    );
    if suffix.is_empty() {
        return [prefix, new_value].concat();
    }

    let Some(prefix_at) = find_bytes(old_line, prefix) else {
        return old_line.to_vec();
    };
    let value_start = prefix_at + prefix.len();

    let mut line = Vec::with_capacity(old_line.len() + new_value.len());
    line.extend_from_slice(&old_line[..value_start]);
    line.extend_from_slice(new_value);
    if let Some(offset) = find_bytes(&old_line[value_start..], suffix) {
        line.extend_from_slice(&old_line[value_start + offset..]);
    }
    line
}

/// Returns `true` if `line` contains `prefix` and, when `suffix` is not empty,
/// also contains `suffix` anywhere in the line.
///
/// Unlike [`value_span`], the suffix position is not tied to the prefix.
pub fn line_matches(
    line: impl AsRef<[u8]>,
    prefix: impl AsRef<[u8]>,
    suffix: impl AsRef<[u8]>,
) -> bool {
    let (line, suffix) = (line.as_ref(), suffix.as_ref());
    find_bytes(line, prefix.as_ref()).is_some()
        && (suffix.is_empty() || find_bytes(line, suffix).is_some())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
