//! Application layer use cases for the linepatch server.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `linepatch-core`) and the infrastructure (file system,
//! HTTP).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "set the
//!   port item to 8443 in every file that mirrors it").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the file-backed adapters can be replaced by mocks in tests.
//! - **Contain no file system access and no HTTP types**.
//!
//! # Sub-modules
//!
//! - **`manage_templates`** – The [`TemplateRepository`] port through which
//!   templates are listed, loaded, saved and deleted.
//!
//! - **`read_values`** – The [`TargetReader`] port plus the "open a
//!   template" and "check template status" use cases.
//!
//! - **`apply_changes`** – The [`ModificationSink`] port plus expansion of a
//!   submitted value map into a patch batch, and the pre-check that reports
//!   what would fail before anything is written.

pub mod apply_changes;
pub mod manage_templates;
pub mod read_values;

pub use apply_changes::{
    apply_values, plan_modifications, precheck, ApplyOutcome, BatchSummary, ModificationPlan,
    ModificationSink, PatchError, PreCheckIssue, PreCheckReport,
};
pub use manage_templates::{StoreError, TemplateRepository};
pub use read_values::{
    check_template_status, fill_current_values, ItemStatus, LocateError, StatusKind,
    TargetReader, TargetStatus, TemplateStatus,
};
