//! JSON-file template store.
//!
//! Every template is one record `<templates_dir>/<id>.json`, pretty-printed
//! with two-space indentation.  The directory is injected at construction and
//! created if missing.
//!
//! Identifiers become file names, so an identifier that is empty, contains a
//! path separator or starts with `.` can never name a record: `get` and
//! `delete` report it as not found, `save` rejects it as invalid.

use std::path::{Path, PathBuf};

use linepatch_core::Template;
use tracing::{debug, info};

use crate::application::manage_templates::{StoreError, TemplateRepository};

const RECORD_EXTENSION: &str = "json";

/// [`TemplateRepository`] backed by a directory of JSON records.
#[derive(Debug, Clone)]
pub struct JsonTemplateStore {
    dir: PathBuf,
}

impl JsonTemplateStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        info!("template store opened at {}", dir.display());
        Ok(Self { dir })
    }

    /// The directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `id`, or `None` when `id` cannot be a file name.
    fn record_path(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| self.dir.join(format!("{id}.{RECORD_EXTENSION}")))
    }

    fn read_record(path: &Path) -> Result<Template, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

impl TemplateRepository for JsonTemplateStore {
    fn list_all(&self) -> Result<Vec<Template>, StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            let is_record = path.extension().is_some_and(|ext| ext == RECORD_EXTENSION);
            if is_record && entry.file_type().map_err(io_err)?.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let templates = paths
            .iter()
            .map(|path| Self::read_record(path))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("listed {} templates from {}", templates.len(), self.dir.display());
        Ok(templates)
    }

    fn get(&self, id: &str) -> Result<Template, StoreError> {
        let not_found = || StoreError::NotFound { id: id.to_string() };
        let path = self.record_path(id).ok_or_else(not_found)?;
        if !path.is_file() {
            return Err(not_found());
        }
        Self::read_record(&path)
    }

    fn save(&self, mut template: Template) -> Result<Template, StoreError> {
        template.assign_missing_ids();
        template.clear_current_values();

        let path = self
            .record_path(&template.id)
            .ok_or_else(|| StoreError::InvalidId {
                id: template.id.clone(),
            })?;
        let content =
            serde_json::to_string_pretty(&template).map_err(|source| StoreError::Serialize {
                id: template.id.clone(),
                source,
            })?;
        std::fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            "saved template '{}' ({}) with {} items",
            template.name,
            template.id,
            template.items.len()
        );
        Ok(template)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self
            .record_path(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted template {id}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { id: id.to_string() })
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
