use std::collections::HashMap;

use chrono::{DateTime, Utc};

use quiz_core::model::QuizItem;

use crate::error::SessionError;

/// Result of a single answer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The choice was recorded; `correct` says whether it scored.
    Recorded { correct: bool },
    /// The question was already locked by an earlier answer; nothing
    /// changed, whatever option the event carried.
    AlreadyAnswered,
}

/// One page of questions, addressed by absolute item index.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub start: usize,
    pub items: &'a [QuizItem],
}

impl PageView<'_> {
    /// Absolute index of a page-relative position.
    #[must_use]
    pub fn absolute_index(&self, index_on_page: usize) -> usize {
        self.start + index_on_page
    }
}

/// Paginated, first-answer-wins quiz session.
///
/// Created in progress with the cursor on the first page; advances page
/// by page and completes when the cursor moves past the last question.
/// The first recorded answer per question is final.
#[derive(Debug, Clone)]
pub struct QuizSession {
    items: Vec<QuizItem>,
    cursor: usize,
    page_size: usize,
    score: usize,
    answers: HashMap<usize, String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over the given items.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` without items and
    /// `SessionError::EmptyPage` for a zero page size.
    pub fn new(
        items: Vec<QuizItem>,
        page_size: usize,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::Empty);
        }
        if page_size == 0 {
            return Err(SessionError::EmptyPage);
        }

        Ok(Self {
            items,
            cursor: 0,
            page_size,
            score: 0,
            answers: HashMap::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The recorded choice for an absolute item index, if any.
    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// The page under the cursor. Empty once the session has completed.
    #[must_use]
    pub fn current_page(&self) -> PageView<'_> {
        let start = self.cursor.min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        PageView {
            start,
            items: &self.items[start..end],
        }
    }

    /// Record the user's choice for a question on the current page.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session has finished
    /// and `SessionError::OutOfRange` for a position past the current
    /// page.
    pub fn answer(
        &mut self,
        index_on_page: usize,
        chosen: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        let page = self.current_page();
        if index_on_page >= page.items.len() {
            return Err(SessionError::OutOfRange(index_on_page));
        }
        let index = page.absolute_index(index_on_page);

        if self.answers.contains_key(&index) {
            return Ok(AnswerOutcome::AlreadyAnswered);
        }

        let correct = self.items[index].is_correct(chosen);
        self.answers.insert(index, chosen.to_string());
        if correct {
            self.score += 1;
        }
        Ok(AnswerOutcome::Recorded { correct })
    }

    /// Advance to the next page, completing the session when none remain.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when already finished.
    pub fn next_page(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        self.cursor += self.page_size;
        if self.cursor >= self.items.len() {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Step back one page; the first page is a floor, not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when already finished.
    pub fn prev_page(&mut self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        self.cursor = self.cursor.saturating_sub(self.page_size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::NoteId;
    use quiz_core::time::fixed_now;

    fn items(count: usize) -> Vec<QuizItem> {
        (1..=count)
            .map(|i| {
                QuizItem::new(
                    NoteId::new(i as u64),
                    format!("Q{i}"),
                    format!("A{i}"),
                    vec![format!("A{i}"), "wrong".to_string()],
                )
                .unwrap()
            })
            .collect()
    }

    fn session(count: usize, page_size: usize) -> QuizSession {
        QuizSession::new(items(count), page_size, fixed_now()).unwrap()
    }

    #[test]
    fn rejects_empty_items_and_zero_page_size() {
        assert_eq!(
            QuizSession::new(Vec::new(), 5, fixed_now()).unwrap_err(),
            SessionError::Empty
        );
        assert_eq!(
            QuizSession::new(items(1), 0, fixed_now()).unwrap_err(),
            SessionError::EmptyPage
        );
    }

    #[test]
    fn pages_cover_every_item_exactly_once() {
        let mut session = session(5, 2);
        let mut covered = Vec::new();

        loop {
            let page = session.current_page();
            for offset in 0..page.items.len() {
                covered.push(page.absolute_index(offset));
            }
            session.next_page(fixed_now()).unwrap();
            if session.is_complete() {
                break;
            }
        }

        assert_eq!(covered, vec![0, 1, 2, 3, 4]);
        assert_eq!(session.page_count(), 3);
    }

    #[test]
    fn page_cursors_run_zero_two_four_then_complete() {
        let mut session = session(5, 2);
        assert_eq!(session.cursor(), 0);

        session.next_page(fixed_now()).unwrap();
        assert_eq!(session.cursor(), 2);
        assert!(!session.is_complete());

        session.next_page(fixed_now()).unwrap();
        assert_eq!(session.cursor(), 4);
        assert!(!session.is_complete());

        session.next_page(fixed_now()).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn prev_page_floors_at_zero_and_keeps_answers() {
        let mut session = session(5, 2);
        session.answer(0, "A1").unwrap();
        session.next_page(fixed_now()).unwrap();

        session.prev_page().unwrap();
        session.prev_page().unwrap();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.answer_for(0), Some("A1"));
    }

    #[test]
    fn scoring_uses_canonical_equality() {
        let mut session = session(2, 2);
        session.answer(0, "  a1 ").unwrap();
        session.answer(1, "wrong").unwrap();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn first_answer_wins() {
        let mut session = session(3, 3);

        let first = session.answer(0, "wrong").unwrap();
        assert_eq!(first, AnswerOutcome::Recorded { correct: false });

        // The same UI event re-fires with a different (correct) option.
        let second = session.answer(0, "A1").unwrap();
        assert_eq!(second, AnswerOutcome::AlreadyAnswered);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answer_for(0), Some("wrong"));
    }

    #[test]
    fn answers_address_the_current_page() {
        let mut session = session(5, 2);
        session.next_page(fixed_now()).unwrap();

        // Position 0 on page two is absolute index 2.
        session.answer(0, "A3").unwrap();
        assert_eq!(session.answer_for(2), Some("A3"));
        assert_eq!(session.score(), 1);

        assert_eq!(
            session.answer(2, "A3").unwrap_err(),
            SessionError::OutOfRange(2)
        );
    }

    #[test]
    fn completed_sessions_reject_further_events() {
        let mut session = session(2, 2);
        session.next_page(fixed_now()).unwrap();
        assert!(session.is_complete());

        assert_eq!(session.answer(0, "A1").unwrap_err(), SessionError::Completed);
        assert_eq!(
            session.next_page(fixed_now()).unwrap_err(),
            SessionError::Completed
        );
        assert_eq!(session.prev_page().unwrap_err(), SessionError::Completed);
        assert!(session.current_page().items.is_empty());
    }
}
