//! Domain entities for linepatch.
//!
//! Pure types with no file system, network or async dependencies:
//!
//! - **`template`** – the persisted model (`Template`, `ConfigItem`,
//!   `FileTarget`) and the transient request types (`MatchResult`,
//!   `ModificationTask`).
//! - **`inspection`** – the classification of a target that does not fit its
//!   file (`TargetIssue`) and the line-level check that produces it.

pub mod inspection;
pub mod template;
