//! End-to-end session scenarios through the public API

use quizterm::bank::QuestionBank;
use quizterm::models::{AnswerInput, Question, QuestionKind, ScoreResult, TopicChoice};
use quizterm::session::{QuizSession, SessionSettings, SessionState, TapOutcome};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn single(topic: &str, n: usize) -> Question {
    Question {
        topic: topic.to_string(),
        kind: QuestionKind::Single,
        prompt: format!("{} question {}", topic, n),
        options: vec!["right".to_string(), "wrong".to_string()],
        answer: vec!["right".to_string()],
    }
}

/// Three topics with 5, 5 and 10 questions
fn bank() -> QuestionBank {
    let mut questions = Vec::new();
    questions.extend((0..5).map(|n| single("History", n)));
    questions.extend((0..5).map(|n| single("Science", n)));
    questions.extend((0..10).map(|n| single("Sports", n)));
    QuestionBank::new(questions)
}

fn start(session: &mut QuizSession, topic: TopicChoice, bank: &QuestionBank, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    session
        .start_with_rng(Some(&topic), bank.questions(), &mut rng)
        .unwrap();
}

#[test]
fn test_topic_selection_takes_every_question_once() {
    let bank = bank();
    let topics = bank.distinct_topics();
    assert_eq!(topics.len(), 4);
    assert_eq!(topics[3], TopicChoice::Random);

    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, topics[2].clone(), &bank, 7);

    assert_eq!(session.len(), 10);
    let prompts: HashSet<&str> = session.questions().iter().map(|q| q.prompt.as_str()).collect();
    let expected: HashSet<&str> = bank
        .questions()
        .iter()
        .filter(|q| q.topic == "Sports")
        .map(|q| q.prompt.as_str())
        .collect();
    assert_eq!(prompts, expected);
}

#[test]
fn test_topic_order_is_randomized() {
    let bank = bank();
    let original: Vec<&str> = bank
        .questions()
        .iter()
        .filter(|q| q.topic == "Sports")
        .map(|q| q.prompt.as_str())
        .collect();

    // At least one seed out of several must produce a different order
    let reordered = (0..8).any(|seed| {
        let mut session = QuizSession::new(SessionSettings::default());
        start(&mut session, TopicChoice::Topic("Sports".to_string()), &bank, seed);
        let order: Vec<&str> = session.questions().iter().map(|q| q.prompt.as_str()).collect();
        order != original
    });
    assert!(reordered);
}

#[test]
fn test_random_mode_sample_size() {
    let bank = bank();

    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Random, &bank, 1);
    assert_eq!(session.len(), 20);

    let settings = SessionSettings {
        random_sample_size: 6,
        ..SessionSettings::default()
    };
    let mut session = QuizSession::new(settings);
    start(&mut session, TopicChoice::Random, &bank, 1);
    assert_eq!(session.len(), 6);

    let small = QuestionBank::new((0..3).map(|n| single("Tiny", n)).collect());
    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Random, &small, 1);
    assert_eq!(session.len(), 3);
}

#[test]
fn test_timer_expiry_scores_unanswered_as_incorrect() {
    let bank = bank();
    let settings = SessionSettings {
        time_limit_secs: 5,
        ..SessionSettings::default()
    };
    let mut session = QuizSession::new(settings);
    start(&mut session, TopicChoice::Topic("Sports".to_string()), &bank, 3);

    // Answer 8 of 10 correctly
    for index in 0..8 {
        session.record_answer(index, AnswerInput::Select("right".to_string()));
    }

    let mut expired = None;
    for _ in 0..5 {
        expired = session.tick();
    }

    assert_eq!(expired, Some(ScoreResult { correct: 8, total: 10 }));
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.remaining_secs(), 0);

    let reviews = session.build_correction();
    assert_eq!(reviews.iter().filter(|r| r.user_answer.is_empty()).count(), 2);
}

#[test]
fn test_finish_is_idempotent() {
    let bank = bank();
    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Topic("History".to_string()), &bank, 9);
    session.record_answer(0, AnswerInput::Select("right".to_string()));

    let first = session.finish();
    let second = session.finish();
    assert_eq!(first, second);
    assert_eq!(first, ScoreResult { correct: 1, total: 5 });
}

#[test]
fn test_set_equality_and_order_scoring() {
    let multiple = Question {
        topic: "Letters".to_string(),
        kind: QuestionKind::Multiple,
        prompt: "Pick a and b".to_string(),
        options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        answer: vec!["a".to_string(), "b".to_string()],
    };
    let order = Question {
        topic: "Letters".to_string(),
        kind: QuestionKind::Order,
        prompt: "Sort x y z".to_string(),
        options: vec!["y".to_string(), "x".to_string(), "z".to_string()],
        answer: vec!["x".to_string(), "y".to_string(), "z".to_string()],
    };
    let bank = QuestionBank::new(vec![multiple, order]);

    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Topic("Letters".to_string()), &bank, 5);

    let multiple_index = session
        .questions()
        .iter()
        .position(|q| q.kind == QuestionKind::Multiple)
        .unwrap();
    let order_index = 1 - multiple_index;

    session.record_answer(multiple_index, AnswerInput::Toggle("b".to_string()));
    session.record_answer(multiple_index, AnswerInput::Toggle("a".to_string()));

    // Order options keep their starting arrangement, which is wrong
    assert_eq!(session.arrangement(order_index), ["y", "x", "z"]);

    let score = session.finish();
    assert_eq!(score, ScoreResult { correct: 1, total: 2 });
}

#[test]
fn test_swap_protocol_and_save_on_swap() {
    let order = Question {
        topic: "Steps".to_string(),
        kind: QuestionKind::Order,
        prompt: "Order the steps".to_string(),
        options: vec!["b".to_string(), "a".to_string(), "c".to_string(), "d".to_string()],
        answer: vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()],
    };
    let bank = QuestionBank::new(vec![order]);
    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Topic("Steps".to_string()), &bank, 2);

    // Arm then tap the same item: nothing moves
    assert_eq!(session.tap(2), TapOutcome::Armed(2));
    assert_eq!(session.tap(2), TapOutcome::Disarmed);
    assert_eq!(session.armed(), None);
    assert_eq!(session.arrangement(0), ["b", "a", "c", "d"]);

    // Arm then tap another: exactly those two swap
    assert_eq!(session.tap(0), TapOutcome::Armed(0));
    assert_eq!(session.tap(1), TapOutcome::Swapped(0, 1));
    assert_eq!(session.arrangement(0), ["a", "b", "c", "d"]);

    // Submitting straight after the swap keeps it
    assert_eq!(session.finish(), ScoreResult { correct: 1, total: 1 });
}

#[test]
fn test_navigation_bounds() {
    let bank = bank();
    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Topic("History".to_string()), &bank, 4);

    session.go_to(-1);
    assert_eq!(session.current_index(), 0);

    for _ in 0..10 {
        session.next();
    }
    assert_eq!(session.current_index(), 4);
    assert!(session.is_last());

    session.go_to(1);
    assert_eq!(session.current_index(), 4);
}

#[test]
fn test_restart_allows_new_session() {
    let bank = bank();
    let mut session = QuizSession::new(SessionSettings::default());
    start(&mut session, TopicChoice::Topic("Science".to_string()), &bank, 4);
    session.finish();

    session.reset();
    assert_eq!(session.state(), SessionState::NotStarted);
    assert!(session.is_empty());

    start(&mut session, TopicChoice::Topic("Sports".to_string()), &bank, 4);
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.len(), 10);
}
