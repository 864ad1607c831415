use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{NoteId, QuizConfigDraft, QuizItem};
use storage::repository::{ConfigRepository, HistoryRepository, NoteStore};

use crate::config_service::ConfigService;
use crate::error::QuizFlowError;
use crate::export_service;
use crate::generator::QuizGenerator;
use crate::pool_service::{PoolRequest, PoolService};
use crate::results_view::ResultsView;
use crate::session_service::{AnswerOutcome, QuizSession};

//
// ─── START REQUEST ─────────────────────────────────────────────────────────────
//

/// Everything the config panel submits to start a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub deck: String,
    /// Note type filter; empty means any type.
    pub model: String,
    pub prompt_field: String,
    pub answer_field: String,
    pub exclude_tags: Vec<String>,
    pub num_questions: u32,
    pub num_choices: u32,
    pub num_per_page: u32,
    pub allow_answer_reuse: bool,
    /// Remove previously quizzed notes from the pool before generation.
    pub exclude_seen: bool,
}

impl StartRequest {
    fn to_draft(&self) -> QuizConfigDraft {
        QuizConfigDraft {
            default_deck: self.deck.clone(),
            num_choices: self.num_choices,
            num_questions: self.num_questions,
            exclude_tags: self.exclude_tags.clone(),
            allow_answer_reuse: self.allow_answer_reuse,
            last_model_name: self.model.clone(),
            last_prompt_field: self.prompt_field.clone(),
            last_answer_field: self.answer_field.clone(),
            num_per_page: self.num_per_page,
        }
    }
}

//
// ─── FLOW STATE ────────────────────────────────────────────────────────────────
//

/// Dialog-level quiz state.
///
/// The host dialog owns exactly one of these and feeds user events into
/// it through [`QuizFlowService`]; there is no other session state.
#[derive(Debug, Default)]
pub enum QuizFlow {
    #[default]
    Configuring,
    InProgress(QuizSession),
    Complete {
        session: QuizSession,
        results: ResultsView,
    },
    Closed,
}

impl QuizFlow {
    #[must_use]
    pub fn is_configuring(&self) -> bool {
        matches!(self, QuizFlow::Configuring)
    }

    /// The live or finished session, while one exists.
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match self {
            QuizFlow::InProgress(session) | QuizFlow::Complete { session, .. } => Some(session),
            QuizFlow::Configuring | QuizFlow::Closed => None,
        }
    }

    /// The results view, once the session has completed.
    #[must_use]
    pub fn results(&self) -> Option<&ResultsView> {
        match self {
            QuizFlow::Complete { results, .. } => Some(results),
            _ => None,
        }
    }
}

//
// ─── ORCHESTRATION ─────────────────────────────────────────────────────────────
//

/// Orchestrates quiz start, answering, pagination, completion, history,
/// and export over the host collaborator traits.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    notes: Arc<dyn NoteStore>,
    history: Arc<dyn HistoryRepository>,
    config: ConfigService,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        notes: Arc<dyn NoteStore>,
        history: Arc<dyn HistoryRepository>,
        config: Arc<dyn ConfigRepository>,
    ) -> Self {
        Self {
            clock,
            notes,
            history,
            config: ConfigService::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    /// Start a new quiz and move the flow to `InProgress`.
    ///
    /// On any failure the flow is left exactly as it was; nothing is
    /// persisted. The submitted settings are remembered (best-effort)
    /// only once the quiz actually exists.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Pool` when nothing survives the
    /// deck/tag/model/field filters (or history exclusion removed
    /// everything); validation, generator, and session errors pass
    /// through.
    pub fn start(
        &self,
        flow: &mut QuizFlow,
        request: &StartRequest,
    ) -> Result<(), QuizFlowError> {
        let config = request.to_draft().validate()?;

        let mut note_ids = self
            .notes
            .find_note_ids(&request.deck, &request.exclude_tags)?;
        if request.exclude_seen {
            let seen = self.history.load().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to load quiz history, not excluding");
                HashSet::new()
            });
            note_ids.retain(|id| !seen.contains(id));
        }

        let pool = PoolService::new(Arc::clone(&self.notes)).build_pool(&PoolRequest {
            deck: &request.deck,
            note_ids: &note_ids,
            prompt_field: &request.prompt_field,
            answer_field: &request.answer_field,
            required_model: (!request.model.is_empty()).then_some(request.model.as_str()),
        })?;

        let items = QuizGenerator::from_config(&config).build(&pool)?;
        let session = QuizSession::new(items, config.num_per_page() as usize, self.clock.now())?;

        self.config.persist(&config);
        tracing::debug!(questions = session.total(), "quiz started");
        *flow = QuizFlow::InProgress(session);
        Ok(())
    }

    /// Forward an answer event to the in-progress session.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotInProgress` outside a running quiz;
    /// session errors pass through.
    pub fn answer(
        &self,
        flow: &mut QuizFlow,
        index_on_page: usize,
        chosen: &str,
    ) -> Result<AnswerOutcome, QuizFlowError> {
        let QuizFlow::InProgress(session) = flow else {
            return Err(QuizFlowError::NotInProgress);
        };
        Ok(session.answer(index_on_page, chosen)?)
    }

    /// Advance one page. Completing the last page persists the session's
    /// note ids to history (best-effort) and builds the results view.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotInProgress` outside a running quiz;
    /// session errors pass through.
    pub fn next_page(&self, flow: &mut QuizFlow) -> Result<(), QuizFlowError> {
        let QuizFlow::InProgress(session) = flow else {
            return Err(QuizFlowError::NotInProgress);
        };
        session.next_page(self.clock.now())?;
        if !session.is_complete() {
            return Ok(());
        }

        let seen: HashSet<NoteId> = session.items().iter().map(QuizItem::source_id).collect();
        if let Err(err) = self.history.save(&seen) {
            tracing::warn!(error = %err, "failed to persist quiz history");
        }

        let results = ResultsView::from_session(session);
        if let QuizFlow::InProgress(session) = std::mem::take(flow) {
            *flow = QuizFlow::Complete { session, results };
        }
        Ok(())
    }

    /// Step back one page.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotInProgress` outside a running quiz;
    /// session errors pass through.
    pub fn prev_page(&self, flow: &mut QuizFlow) -> Result<(), QuizFlowError> {
        let QuizFlow::InProgress(session) = flow else {
            return Err(QuizFlowError::NotInProgress);
        };
        session.prev_page()?;
        Ok(())
    }

    /// Export the completed quiz's results to an HTML file.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotComplete` before completion and
    /// `QuizFlowError::Export` when the write fails; the results stay
    /// available for another attempt.
    pub fn export(&self, flow: &QuizFlow, path: &Path) -> Result<(), QuizFlowError> {
        let QuizFlow::Complete { results, .. } = flow else {
            return Err(QuizFlowError::NotComplete);
        };
        export_service::export_results(results, path)?;
        Ok(())
    }

    /// Drop any session data and return to configuration.
    ///
    /// An unfinished session persists nothing, so aborting mid-quiz
    /// leaves history untouched.
    pub fn retry(&self, flow: &mut QuizFlow) {
        *flow = QuizFlow::Configuring;
    }

    /// Close the dialog. Like retry, an unfinished session persists
    /// nothing.
    pub fn close(&self, flow: &mut QuizFlow) {
        *flow = QuizFlow::Closed;
    }

    /// Wipe the persisted history entirely.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Storage` when the backing store cannot be
    /// reset.
    pub fn clear_history(&self) -> Result<(), QuizFlowError> {
        self.history.clear()?;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
