use std::sync::Arc;

use quiz_core::model::{QuizConfig, QuizConfigDraft, QuizConfigError};
use storage::repository::ConfigRepository;

use crate::catalog_service::NoteTypeInfo;

const PROMPT_FIELD_GUESSES: [&str; 3] = ["Front", "Question", "Prompt"];
const ANSWER_FIELD_GUESSES: [&str; 3] = ["Back", "Answer", "Response"];

/// Loads and persists quiz configuration.
///
/// Persistence is best-effort in both directions: unreadable state loads
/// as defaults and a failed write never blocks the quiz.
#[derive(Clone)]
pub struct ConfigService {
    repo: Arc<dyn ConfigRepository>,
}

impl ConfigService {
    #[must_use]
    pub fn new(repo: Arc<dyn ConfigRepository>) -> Self {
        Self { repo }
    }

    /// Persisted configuration, or defaults when nothing usable is stored.
    #[must_use]
    pub fn load(&self) -> QuizConfig {
        match self.repo.load() {
            Ok(Some(config)) => config,
            Ok(None) => QuizConfig::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read quiz config, using defaults");
                QuizConfig::default()
            }
        }
    }

    /// Validate and persist new configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` when the draft fails validation. Write
    /// failures are swallowed with a warning.
    pub fn save(&self, draft: QuizConfigDraft) -> Result<QuizConfig, QuizConfigError> {
        let config = draft.validate()?;
        self.persist(&config);
        Ok(config)
    }

    /// Best-effort write of already-validated configuration.
    pub fn persist(&self, config: &QuizConfig) {
        if let Err(err) = self.repo.save(config) {
            tracing::warn!(error = %err, "failed to persist quiz config");
        }
    }
}

/// Resolved model/field preselection for the config panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefaults {
    pub model: String,
    pub prompt_field: String,
    pub answer_field: String,
}

/// Pick the note type and fields to preselect for a deck.
///
/// A remembered name that no longer exists in the catalog silently falls
/// back: the model to the first catalog entry, each field to a guess
/// list (`Front`/`Question`/`Prompt`, `Back`/`Answer`/`Response`), else
/// empty. Never an error, only a degraded default.
#[must_use]
pub fn resolve_defaults(config: &QuizConfig, catalog: &[NoteTypeInfo]) -> FieldDefaults {
    let model = catalog
        .iter()
        .find(|info| info.name == config.last_model_name())
        .or_else(|| catalog.first());
    let Some(model) = model else {
        return FieldDefaults::default();
    };

    FieldDefaults {
        model: model.name.clone(),
        prompt_field: pick_field(
            &model.fields,
            config.last_prompt_field(),
            &PROMPT_FIELD_GUESSES,
        ),
        answer_field: pick_field(
            &model.fields,
            config.last_answer_field(),
            &ANSWER_FIELD_GUESSES,
        ),
    }
}

fn pick_field(fields: &[String], remembered: &str, guesses: &[&str]) -> String {
    if !remembered.is_empty() && fields.iter().any(|field| field == remembered) {
        return remembered.to_string();
    }
    guesses
        .iter()
        .find(|guess| fields.iter().any(|field| field == *guess))
        .map_or_else(String::new, |guess| (*guess).to_string())
}
