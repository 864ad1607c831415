use std::sync::Arc;

use quiz_core::model::{NoteId, QuestionSource};
use storage::repository::NoteStore;

use crate::error::PoolError;

/// Filters for one pool build, as submitted by the config panel.
///
/// `deck` is carried for error reporting only; the note ids have already
/// been resolved against it.
#[derive(Debug, Clone, Copy)]
pub struct PoolRequest<'a> {
    pub deck: &'a str,
    pub note_ids: &'a [NoteId],
    pub prompt_field: &'a str,
    pub answer_field: &'a str,
    pub required_model: Option<&'a str>,
}

/// Builds question pools from host notes.
#[derive(Clone)]
pub struct PoolService {
    notes: Arc<dyn NoteStore>,
}

impl PoolService {
    #[must_use]
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// Turn note ids into prompt/answer pairs.
    ///
    /// Notes are skipped when they cannot be resolved, their type name
    /// differs from `required_model`, either named field is missing, or
    /// either side is blank after trimming. Markup survives verbatim,
    /// input order is kept, and duplicate ids are not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Empty` (with the active filter values) when
    /// nothing survives, and `PoolError::Storage` when the host lookup
    /// itself fails.
    pub fn build_pool(
        &self,
        request: &PoolRequest<'_>,
    ) -> Result<Vec<QuestionSource>, PoolError> {
        let mut pool = Vec::new();

        for &id in request.note_ids {
            let Some(note) = self.notes.get_note(id)? else {
                continue;
            };
            if let Some(required) = request.required_model {
                if note.note_type != required {
                    continue;
                }
            }
            let (Some(prompt), Some(answer)) = (
                note.field(request.prompt_field),
                note.field(request.answer_field),
            ) else {
                continue;
            };
            let prompt = prompt.trim();
            let answer = answer.trim();
            if prompt.is_empty() || answer.is_empty() {
                continue;
            }
            pool.push(QuestionSource::new(id, prompt, answer));
        }

        if pool.is_empty() {
            return Err(PoolError::Empty {
                deck: request.deck.to_string(),
                model: request.required_model.unwrap_or_default().to_string(),
                prompt_field: request.prompt_field.to_string(),
                answer_field: request.answer_field.to_string(),
            });
        }

        tracing::debug!(pool_size = pool.len(), "question pool built");
        Ok(pool)
    }
}
