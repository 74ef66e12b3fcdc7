//! JSON file backed document store.

use super::{DocumentStore, StoreError};
use crate::models::SurveyDocument;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Stores the document as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory the temporary file is created in, so the final rename stays
    /// on one filesystem.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<SurveyDocument, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let document: SurveyDocument =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Loaded {} questions and {} responses from {}",
            document.settings.questions.len(),
            document.responses.len(),
            self.path.display()
        );

        Ok(document)
    }

    fn save(&self, document: &SurveyDocument) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(document)?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = self.parent_dir();
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        info!("Saved document to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
