use serde::{Deserialize, Serialize};

use crate::model::NoteId;

/// A prompt/answer pair extracted from one host note.
///
/// Both sides keep their markup verbatim; canonicalization happens only
/// when answers are compared for equality, never for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSource {
    id: NoteId,
    prompt: String,
    answer: String,
}

impl QuestionSource {
    #[must_use]
    pub fn new(id: NoteId, prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NoteId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}
