use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::NoteId;
use crate::normalize::canonical_key;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizItemError {
    #[error("a quiz item needs at least one option")]
    NoOptions,

    #[error("no option matches the correct answer")]
    CorrectAnswerMissing,
}

/// One generated multiple-choice question.
///
/// The option list always contains the correct answer (by canonical key).
/// It may contain duplicate texts when the answer-reuse policy padded the
/// options, so uniqueness is deliberately not part of the invariant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    source_id: NoteId,
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
}

impl QuizItem {
    /// Build a quiz item, checking that the options can actually be scored.
    ///
    /// # Errors
    ///
    /// Returns `QuizItemError::NoOptions` for an empty option list and
    /// `QuizItemError::CorrectAnswerMissing` when no option matches the
    /// correct answer under canonicalization.
    pub fn new(
        source_id: NoteId,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuizItemError> {
        if options.is_empty() {
            return Err(QuizItemError::NoOptions);
        }

        let correct_answer = correct_answer.into();
        let key = canonical_key(&correct_answer);
        if !options.iter().any(|option| canonical_key(option) == key) {
            return Err(QuizItemError::CorrectAnswerMissing);
        }

        Ok(Self {
            source_id,
            prompt: prompt.into(),
            correct_answer,
            options,
        })
    }

    #[must_use]
    pub fn source_id(&self) -> NoteId {
        self.source_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Whether the given choice scores as correct.
    #[must_use]
    pub fn is_correct(&self, chosen: &str) -> bool {
        canonical_key(chosen) == canonical_key(&self.correct_answer)
    }
}
