//! # linepatch-core
//!
//! Shared library for linepatch containing the template model, the rules that
//! locate and rewrite a value inside a line of text, and path sanitisation.
//!
//! It has zero dependencies on the file system, async runtimes or HTTP.  The
//! `linepatch-server` crate wraps these rules with file I/O, persistence and
//! the web API.
//!
//! # Architecture overview
//!
//! linepatch lets a user describe where configuration values live inside
//! arbitrary text files ("templates") and then read or bulk-edit those values.
//! A value is found by file path, 1-based line number and a prefix/suffix
//! pair, without parsing the file format:
//!
//! ```text
//! db.url = "postgres://localhost:5432/app" # primary
//!          ^                              ^
//!        prefix `db.url = "`          suffix `"`
//! ```
//!
//! - **`domain`** – `Template`, `ConfigItem`, `FileTarget` and friends, plus the
//!   classification of targets that no longer fit their files.
//! - **`text`** – value extraction, line rewriting, line matching and path
//!   sanitisation.

pub mod domain;
pub mod text;

pub use domain::inspection::{inspect_lines, TargetIssue};
pub use domain::template::{ConfigItem, FileTarget, MatchResult, ModificationTask, Template};
pub use text::locate::{build_new_line, extract_value, line_matches, value_span};
pub use text::path::sanitize_path;
