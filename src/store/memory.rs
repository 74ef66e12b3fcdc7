//! In-memory document store.

use super::{DocumentStore, StoreError};
use crate::models::SurveyDocument;
use std::path::PathBuf;
use std::sync::Mutex;

/// Keeps the document in memory. Starts out empty unless seeded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<SurveyDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: SurveyDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<SurveyDocument, StoreError> {
        let guard = self.document.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().cloned().ok_or_else(|| StoreError::NotFound {
            path: PathBuf::from(self.describe()),
        })
    }

    fn save(&self, document: &SurveyDocument) -> Result<(), StoreError> {
        let mut guard = self.document.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(document.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
