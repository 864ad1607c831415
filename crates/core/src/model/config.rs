use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizConfigError {
    #[error("at least 2 answer choices are required (got {0})")]
    TooFewChoices(u32),

    #[error("at least 1 question is required")]
    NoQuestions,

    #[error("at least 1 question per page is required")]
    EmptyPage,
}

/// Validated quiz configuration.
///
/// Construct via [`QuizConfigDraft::validate`]; defaults are valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    default_deck: String,
    num_choices: u32,
    num_questions: u32,
    exclude_tags: Vec<String>,
    allow_answer_reuse: bool,
    last_model_name: String,
    last_prompt_field: String,
    last_answer_field: String,
    num_per_page: u32,
}

/// Unvalidated configuration as submitted by the config panel or read
/// back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfigDraft {
    pub default_deck: String,
    pub num_choices: u32,
    pub num_questions: u32,
    pub exclude_tags: Vec<String>,
    pub allow_answer_reuse: bool,
    pub last_model_name: String,
    pub last_prompt_field: String,
    pub last_answer_field: String,
    pub num_per_page: u32,
}

impl Default for QuizConfigDraft {
    fn default() -> Self {
        Self::from_config(&QuizConfig::default())
    }
}

impl QuizConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        Self {
            default_deck: config.default_deck.clone(),
            num_choices: config.num_choices,
            num_questions: config.num_questions,
            exclude_tags: config.exclude_tags.clone(),
            allow_answer_reuse: config.allow_answer_reuse,
            last_model_name: config.last_model_name.clone(),
            last_prompt_field: config.last_prompt_field.clone(),
            last_answer_field: config.last_answer_field.clone(),
            num_per_page: config.num_per_page,
        }
    }

    /// Range-check the draft into validated settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` when a count is out of range.
    pub fn validate(self) -> Result<QuizConfig, QuizConfigError> {
        if self.num_choices < 2 {
            return Err(QuizConfigError::TooFewChoices(self.num_choices));
        }
        if self.num_questions < 1 {
            return Err(QuizConfigError::NoQuestions);
        }
        if self.num_per_page < 1 {
            return Err(QuizConfigError::EmptyPage);
        }

        Ok(QuizConfig {
            default_deck: self.default_deck,
            num_choices: self.num_choices,
            num_questions: self.num_questions,
            exclude_tags: self.exclude_tags,
            allow_answer_reuse: self.allow_answer_reuse,
            last_model_name: self.last_model_name,
            last_prompt_field: self.last_prompt_field,
            last_answer_field: self.last_answer_field,
            num_per_page: self.num_per_page,
        })
    }
}

impl QuizConfig {
    #[must_use]
    pub fn default_deck(&self) -> &str {
        &self.default_deck
    }

    #[must_use]
    pub fn num_choices(&self) -> u32 {
        self.num_choices
    }

    #[must_use]
    pub fn num_questions(&self) -> u32 {
        self.num_questions
    }

    #[must_use]
    pub fn exclude_tags(&self) -> &[String] {
        &self.exclude_tags
    }

    #[must_use]
    pub fn allow_answer_reuse(&self) -> bool {
        self.allow_answer_reuse
    }

    #[must_use]
    pub fn last_model_name(&self) -> &str {
        &self.last_model_name
    }

    #[must_use]
    pub fn last_prompt_field(&self) -> &str {
        &self.last_prompt_field
    }

    #[must_use]
    pub fn last_answer_field(&self) -> &str {
        &self.last_answer_field
    }

    #[must_use]
    pub fn num_per_page(&self) -> u32 {
        self.num_per_page
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_deck: String::new(),
            num_choices: 4,
            num_questions: 25,
            exclude_tags: Vec::new(),
            allow_answer_reuse: true,
            last_model_name: String::new(),
            last_prompt_field: String::new(),
            last_answer_field: String::new(),
            num_per_page: 5,
        }
    }
}
