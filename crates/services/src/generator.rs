use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use quiz_core::model::{QuestionSource, QuizConfig, QuizItem};
use quiz_core::normalize::canonical_key;

use crate::error::QuizError;

/// Builds a randomized multiple-choice quiz from a question pool.
///
/// Question selection and distractor sourcing are deliberately separate:
/// distractors are drawn from the answers of the WHOLE pool, not just the
/// selected questions, so a three-question quiz over a large deck still
/// gets varied wrong answers.
#[derive(Debug, Clone)]
pub struct QuizGenerator {
    question_count: u32,
    choice_count: u32,
    allow_answer_reuse: bool,
}

impl QuizGenerator {
    #[must_use]
    pub fn new(question_count: u32, choice_count: u32) -> Self {
        Self {
            question_count,
            choice_count,
            allow_answer_reuse: false,
        }
    }

    /// Generator configured from persisted settings.
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.num_questions(), config.num_choices())
            .with_answer_reuse(config.allow_answer_reuse())
    }

    /// Allow padding option lists by reusing answers with replacement.
    #[must_use]
    pub fn with_answer_reuse(mut self, allow: bool) -> Self {
        self.allow_answer_reuse = allow;
        self
    }

    /// Generate quiz items with the thread rng.
    ///
    /// # Errors
    ///
    /// See [`QuizGenerator::build_with_rng`].
    pub fn build(&self, pool: &[QuestionSource]) -> Result<Vec<QuizItem>, QuizError> {
        self.build_with_rng(pool, &mut rand::rng())
    }

    /// Generate quiz items with a caller-supplied rng.
    ///
    /// Selects `min(question_count, |pool|)` questions at random, then
    /// shuffles the result once more so repeated generations never share
    /// a presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyPool` for an empty pool and
    /// `QuizError::TooFewChoices` when fewer than two options are asked
    /// for.
    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        pool: &[QuestionSource],
        rng: &mut R,
    ) -> Result<Vec<QuizItem>, QuizError> {
        if pool.is_empty() {
            return Err(QuizError::EmptyPool);
        }
        if self.choice_count < 2 {
            return Err(QuizError::TooFewChoices(self.choice_count));
        }

        let mut shuffled: Vec<&QuestionSource> = pool.iter().collect();
        shuffled.shuffle(rng);
        let take = (self.question_count as usize).min(shuffled.len());
        let selected = &shuffled[..take];

        // The global answer universe: every answer in the pool, selected
        // or not, may serve as a distractor.
        let universe: Vec<&str> = pool.iter().map(QuestionSource::answer).collect();

        let mut items = Vec::with_capacity(take);
        for source in selected {
            let options = self.options_for(source.answer(), &universe, rng);
            items.push(QuizItem::new(
                source.id(),
                source.prompt(),
                source.answer(),
                options,
            )?);
        }

        items.shuffle(rng);
        Ok(items)
    }

    /// Option list for one question: the correct answer plus distractors
    /// that differ from it by canonical key, each distinct wrong answer
    /// at most once. With answer reuse on, a short list is padded by
    /// resampling the universe with replacement; with it off, a short
    /// list is returned as-is.
    fn options_for<R: Rng + ?Sized>(
        &self,
        correct: &str,
        universe: &[&str],
        rng: &mut R,
    ) -> Vec<String> {
        let want = self.choice_count as usize;
        let correct_key = canonical_key(correct);

        let mut seen = HashSet::new();
        let mut candidates: Vec<&str> = universe
            .iter()
            .copied()
            .filter(|answer| {
                let key = canonical_key(answer);
                key != correct_key && seen.insert(key)
            })
            .collect();
        candidates.shuffle(rng);

        let mut options = vec![correct.to_string()];
        options.extend(
            candidates
                .iter()
                .take(want.saturating_sub(1))
                .map(|answer| (*answer).to_string()),
        );

        if self.allow_answer_reuse {
            while options.len() < want {
                match universe.choose(rng) {
                    Some(answer) => options.push((*answer).to_string()),
                    None => break,
                }
            }
        }

        options.shuffle(rng);
        options
    }
}
