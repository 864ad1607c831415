use std::sync::LazyLock;

use regex::Regex;

use quiz_core::model::QuizItem;

use crate::session_service::QuizSession;

static BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("break tag pattern is valid")
});

/// Strip markup for plain-text readability.
///
/// Break tags become newlines so line structure survives; every other
/// tag is removed (script/style contents included) and the result is
/// trimmed. Only for display — equality checks use the raw text.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let with_breaks = BREAK_TAG.replace_all(html, "\n");
    let stripped = ammonia::Builder::new()
        .tags(std::collections::HashSet::new())
        .clean(&with_breaks)
        .to_string();
    stripped.trim().to_string()
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// 1-based question position.
    pub position: usize,
    /// Prompt with markup stripped.
    pub prompt: String,
    /// The user's choice with markup stripped; empty when unanswered.
    pub chosen: String,
    /// The correct answer with markup stripped.
    pub correct_answer: String,
    pub passed: bool,
}

/// Presentation-agnostic summary of a finished session.
///
/// No pre-formatted strings beyond markup stripping; the UI decides how
/// rows are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub rows: Vec<ResultRow>,
}

impl ResultsView {
    /// Build the results table for a session.
    ///
    /// Pass/fail is decided on the RAW texts' canonical keys; the
    /// stripped texts are only for reading.
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let total = session.total();
        let score = session.score();

        let rows = session
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| row_for(index, item, session.answer_for(index)))
            .collect();

        Self {
            score,
            total,
            percent: percent_of(score, total),
            rows,
        }
    }
}

fn row_for(index: usize, item: &QuizItem, chosen_raw: Option<&str>) -> ResultRow {
    let chosen_raw = chosen_raw.unwrap_or("");
    ResultRow {
        position: index + 1,
        prompt: strip_markup(item.prompt()),
        chosen: strip_markup(chosen_raw),
        correct_answer: strip_markup(item.correct_answer()),
        passed: item.is_correct(chosen_raw),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percent_of(score: usize, total: usize) -> u32 {
    let total = total.max(1);
    ((100.0 * score as f64) / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::NoteId;
    use quiz_core::time::fixed_now;

    fn item(id: u64, prompt: &str, answer: &str, wrong: &str) -> QuizItem {
        QuizItem::new(
            NoteId::new(id),
            prompt,
            answer,
            vec![answer.to_string(), wrong.to_string()],
        )
        .unwrap()
    }

    #[test]
    fn strip_markup_removes_tags_and_keeps_text() {
        assert_eq!(strip_markup("<b>Paris</b>"), "Paris");
        assert_eq!(strip_markup("plain"), "plain");
    }

    #[test]
    fn strip_markup_turns_break_tags_into_newlines() {
        assert_eq!(strip_markup("one<br>two"), "one\ntwo");
        assert_eq!(strip_markup("one<BR/>two"), "one\ntwo");
        assert_eq!(strip_markup("one<br />two"), "one\ntwo");
    }

    #[test]
    fn rows_carry_stripped_texts_and_pass_flags() {
        let items = vec![
            item(1, "<b>Q1</b>", "<i>A1</i>", "wrong"),
            item(2, "Q2", "A2", "wrong"),
            item(3, "Q3", "A3", "wrong"),
        ];
        let mut session = QuizSession::new(items, 3, fixed_now()).unwrap();
        session.answer(0, "<i>a1</i>").unwrap();
        session.answer(1, "wrong").unwrap();
        session.next_page(fixed_now()).unwrap();

        let view = ResultsView::from_session(&session);
        assert_eq!(view.score, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.percent, 33);

        assert_eq!(view.rows[0].position, 1);
        assert_eq!(view.rows[0].prompt, "Q1");
        assert_eq!(view.rows[0].correct_answer, "A1");
        assert!(view.rows[0].passed);

        assert!(!view.rows[1].passed);

        // Unanswered rows read as empty and fail.
        assert_eq!(view.rows[2].chosen, "");
        assert!(!view.rows[2].passed);
    }

    #[test]
    fn percent_rounds_and_survives_zero_totals() {
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(0, 0), 0);
    }
}
