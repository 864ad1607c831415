//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::model::{QuizConfigError, QuizItemError};
use storage::repository::StorageError;

/// Errors emitted by `PoolService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolError {
    #[error(
        "no notes match deck \"{deck}\", note type \"{model}\", fields \"{prompt_field}\"/\"{answer_field}\""
    )]
    Empty {
        deck: String,
        model: String,
        prompt_field: String,
        answer_field: String,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot generate a quiz from an empty question pool")]
    EmptyPool,
    #[error("at least 2 answer choices are required (got {0})")]
    TooFewChoices(u32),
    #[error(transparent)]
    Item(#[from] QuizItemError),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("page size must be at least 1")]
    EmptyPage,
    #[error("session already completed")]
    Completed,
    #[error("no question at page position {0}")]
    OutOfRange(usize),
}

/// Errors emitted while writing a results export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("failed to write results to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by the quiz flow orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("no quiz in progress")]
    NotInProgress,
    #[error("no completed quiz to export")]
    NotComplete,
    #[error(transparent)]
    Config(#[from] QuizConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
