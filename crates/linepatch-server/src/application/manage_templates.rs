//! Template persistence port.
//!
//! The application layer only sees [`TemplateRepository`]; the JSON-file
//! implementation lives in `infrastructure::storage::template_store`.

use std::path::PathBuf;

use linepatch_core::Template;
use thiserror::Error;

/// Error type for template persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the identifier.
    #[error("template not found: {id}")]
    NotFound { id: String },

    /// A caller-supplied identifier cannot be used as a record name.
    #[error("invalid template id '{id}': must be a plain file name")]
    InvalidId { id: String },

    /// A file system I/O error occurred.
    #[error("I/O error accessing template store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record is not a valid template document.
    #[error("failed to parse template record {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The template could not be serialised.
    #[error("failed to serialize template {id}: {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// CRUD access to persisted templates, one record per identifier.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRepository: Send + Sync {
    /// Returns every stored template in full.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any single record cannot be read or parsed.
    fn list_all(&self) -> Result<Vec<Template>, StoreError>;

    /// Returns the template stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record exists.
    fn get(&self, id: &str) -> Result<Template, StoreError>;

    /// Stores `template`, assigning any missing identifiers, and returns the
    /// stored document.  An existing record with the same identifier is
    /// replaced entirely.
    fn save(&self, template: Template) -> Result<Template, StoreError>;

    /// Removes the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record exists.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}
