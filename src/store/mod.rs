//! Document storage.
//!
//! The console keeps its content in one JSON document that is read and
//! written wholesale. Callers get the document through [`DocumentStore`] and
//! hand plain data to the aggregator.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::SurveyDocument;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving a document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Repository for the content document.
pub trait DocumentStore {
    /// Load the whole document.
    fn load(&self) -> Result<SurveyDocument, StoreError>;

    /// Replace the whole document.
    fn save(&self, document: &SurveyDocument) -> Result<(), StoreError>;

    /// Human-readable location, used in logs and report metadata.
    fn describe(&self) -> String;

    /// Load the document, or start from an empty one if none exists yet.
    fn load_or_default(&self) -> Result<SurveyDocument, StoreError> {
        match self.load() {
            Err(e) if e.is_not_found() => Ok(SurveyDocument::default()),
            other => other,
        }
    }
}
