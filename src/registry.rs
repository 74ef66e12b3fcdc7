//! Survey question registry.
//!
//! Questions are identified by position. Responses store answers under the
//! index a question had when they were submitted, so only appends and in-place
//! text edits keep historical answers aligned.

use crate::analysis::question_index;
use crate::models::SurveyDocument;
use thiserror::Error;
use tracing::debug;

/// Errors from registry edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("question index {index} is out of range (registry has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Returns the stored question list unchanged.
pub fn questions(document: &SurveyDocument) -> &[String] {
    &document.settings.questions
}

/// Append a question. Returns its index.
pub fn add_question(document: &mut SurveyDocument, text: impl Into<String>) -> usize {
    let questions = &mut document.settings.questions;
    questions.push(text.into());
    debug!("Added question #{}", questions.len() - 1);
    questions.len() - 1
}

/// Replace the text of a question, keeping its index. Returns the old text.
pub fn edit_question(
    document: &mut SurveyDocument,
    index: usize,
    text: impl Into<String>,
) -> Result<String, RegistryError> {
    let len = document.settings.questions.len();
    let slot = document
        .settings
        .questions
        .get_mut(index)
        .ok_or(RegistryError::IndexOutOfRange { index, len })?;

    Ok(std::mem::replace(slot, text.into()))
}

/// Outcome of removing a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub removed: String,
    /// Stored responses holding an answer at or after the removed index.
    /// Those answers now refer to a different question, or to none.
    pub misaligned_responses: usize,
}

/// Remove a question, shifting later questions down by one.
pub fn remove_question(document: &mut SurveyDocument, index: usize) -> Result<Removal, RegistryError> {
    let len = document.settings.questions.len();
    if index >= len {
        return Err(RegistryError::IndexOutOfRange { index, len });
    }

    let removed = document.settings.questions.remove(index);
    let misaligned_responses = document
        .responses
        .iter()
        .filter(|r| {
            r.answers
                .keys()
                .filter_map(|key| question_index(key))
                .any(|answered| answered >= index)
        })
        .count();

    Ok(Removal {
        removed,
        misaligned_responses,
    })
}
