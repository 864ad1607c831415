use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{NoteId, NoteTypeId};
use quiz_core::normalize::canonical_key;
use quiz_core::time::fixed_now;
use services::{AnswerOutcome, QuizFlow, QuizFlowService, StartRequest};
use storage::repository::{HistoryRepository, NoteField, NoteRecord};
use storage::{InMemoryHost, JsonConfigStore, JsonHistoryStore};

fn capital_note(id: u64, country: &str, capital: &str) -> NoteRecord {
    NoteRecord {
        id: NoteId::new(id),
        note_type_id: NoteTypeId::new(1),
        note_type: "Basic".to_string(),
        fields: vec![
            NoteField::new("Front", format!("Capital of <b>{country}</b>?")),
            NoteField::new("Back", format!("<i>{capital}</i>")),
        ],
    }
}

fn seeded_host() -> InMemoryHost {
    let host = InMemoryHost::new();
    host.insert_note_type(NoteTypeId::new(1), &["Front", "Back"]);
    let capitals = [
        ("France", "Paris"),
        ("Italy", "Rome"),
        ("Spain", "Madrid"),
        ("Norway", "Oslo"),
        ("Japan", "Tokyo"),
        ("Kenya", "Nairobi"),
    ];
    for (i, (country, capital)) in capitals.iter().enumerate() {
        host.insert_note("Capitals", capital_note(i as u64 + 1, country, capital), &[]);
    }
    host
}

fn start_request() -> StartRequest {
    StartRequest {
        deck: "Capitals".to_string(),
        model: "Basic".to_string(),
        prompt_field: "Front".to_string(),
        answer_field: "Back".to_string(),
        exclude_tags: Vec::new(),
        num_questions: 4,
        num_choices: 4,
        num_per_page: 2,
        allow_answer_reuse: false,
        exclude_seen: false,
    }
}

#[test]
fn full_quiz_run_scores_persists_history_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let host = seeded_host();
    let history = JsonHistoryStore::new(dir.path().join("quiz_history.json"));
    let config = JsonConfigStore::new(dir.path().join("quiz_config.json"));

    let service = QuizFlowService::new(
        Clock::fixed(fixed_now()),
        Arc::new(host),
        Arc::new(history.clone()),
        Arc::new(config),
    );

    let mut flow = QuizFlow::Configuring;
    service.start(&mut flow, &start_request()).unwrap();

    // Answer every question with its correct option; lock-in means a
    // second event for the same question changes nothing.
    while !flow.session().unwrap().is_complete() {
        let answers: Vec<(usize, String)> = {
            let page = flow.session().unwrap().current_page();
            page.items
                .iter()
                .enumerate()
                .map(|(offset, item)| {
                    let correct = item
                        .options()
                        .iter()
                        .find(|option| item.is_correct(option))
                        .expect("correct option present")
                        .clone();
                    (offset, correct)
                })
                .collect()
        };
        for (offset, correct) in answers {
            let outcome = service.answer(&mut flow, offset, &correct).unwrap();
            assert_eq!(outcome, AnswerOutcome::Recorded { correct: true });
            let repeat = service.answer(&mut flow, offset, "nonsense").unwrap();
            assert_eq!(repeat, AnswerOutcome::AlreadyAnswered);
        }
        service.next_page(&mut flow).unwrap();
    }

    let results = flow.results().expect("results after completion");
    assert_eq!(results.score, 4);
    assert_eq!(results.total, 4);
    assert_eq!(results.percent, 100);
    assert!(results.rows.iter().all(|row| row.passed));
    // View text is markup-stripped.
    assert!(results.rows.iter().all(|row| !row.prompt.contains('<')));

    // History now holds the four quizzed notes, durably.
    let seen = history.load().unwrap();
    assert_eq!(seen.len(), 4);

    // Export writes a self-contained document.
    let out = dir.path().join("quiz_results.html");
    service.export(&flow, &out).unwrap();
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("Score: 4/4 (100%)"));
}

#[test]
fn second_run_with_exclusion_only_sees_fresh_notes() {
    let dir = tempfile::tempdir().unwrap();
    let host = seeded_host();
    let history = JsonHistoryStore::new(dir.path().join("quiz_history.json"));
    let config = JsonConfigStore::new(dir.path().join("quiz_config.json"));

    let service = QuizFlowService::new(
        Clock::fixed(fixed_now()),
        Arc::new(host),
        Arc::new(history.clone()),
        Arc::new(config),
    );

    // First run covers four notes.
    let mut flow = QuizFlow::Configuring;
    service.start(&mut flow, &start_request()).unwrap();
    while !flow.session().unwrap().is_complete() {
        service.next_page(&mut flow).unwrap();
    }
    let first_seen: HashSet<NoteId> = history.load().unwrap();
    assert_eq!(first_seen.len(), 4);

    // Second run with exclusion can only quiz the remaining two.
    service.retry(&mut flow);
    let mut request = start_request();
    request.exclude_seen = true;
    service.start(&mut flow, &request).unwrap();

    let session = flow.session().unwrap();
    assert_eq!(session.total(), 2);
    for item in session.items() {
        assert!(!first_seen.contains(&item.source_id()));
    }
}

#[test]
fn generated_options_are_unique_and_contain_the_correct_answer() {
    let dir = tempfile::tempdir().unwrap();
    let host = seeded_host();
    let service = QuizFlowService::new(
        Clock::fixed(fixed_now()),
        Arc::new(host),
        Arc::new(JsonHistoryStore::new(dir.path().join("quiz_history.json"))),
        Arc::new(JsonConfigStore::new(dir.path().join("quiz_config.json"))),
    );

    let mut flow = QuizFlow::Configuring;
    service.start(&mut flow, &start_request()).unwrap();

    for item in flow.session().unwrap().items() {
        assert_eq!(item.options().len(), 4);
        let keys: HashSet<String> = item
            .options()
            .iter()
            .map(|option| canonical_key(option))
            .collect();
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&canonical_key(item.correct_answer())));
    }
}
