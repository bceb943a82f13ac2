//! Integration tests for the terminal screens, drawn on a test backend

use quizterm::app::{AppState, NavigationAction, Screens, StateManager};
use quizterm::bank::QuestionBank;
use quizterm::models::TopicChoice;
use quizterm::session::{Command, Outcome, QuizRunner, SessionSettings};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn bank() -> QuestionBank {
    QuestionBank::parse(
        r#"[
            {"theme": "Git", "type": "single", "question": "Which command records changes?", "options": ["commit", "status"], "answer": ["commit"]},
            {"theme": "Git", "type": "order", "question": "Order the workflow", "options": ["push", "add", "commit"], "answer": ["add", "commit", "push"]},
            {"theme": "Shell", "type": "multiple", "question": "Which are pagers?", "options": ["less", "more", "ls"], "answer": ["less", "more"]}
        ]"#,
    )
    .unwrap()
}

/// Rows of the last drawn frame
fn rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer.get(x, y).symbol().to_string())
                .collect()
        })
        .collect()
}

fn screen_contains(terminal: &Terminal<TestBackend>, needle: &str) -> bool {
    rows(terminal).iter().any(|row| row.contains(needle))
}

#[test]
fn test_topic_screen_lists_topics() {
    let runner = QuizRunner::new(bank(), SessionSettings::default());
    let mut screens = Screens::new(1200);
    runner.show_topics(&mut screens);

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|f| screens.topics.render(f)).unwrap();

    assert!(screen_contains(&terminal, "Git"));
    assert!(screen_contains(&terminal, "Shell"));
    assert!(screen_contains(&terminal, "Random (all questions)"));
}

#[test]
fn test_topic_screen_shows_question_counts() {
    let runner = QuizRunner::new(bank(), SessionSettings::default());
    let mut screens = Screens::new(1200);
    runner.show_topics(&mut screens);
    screens.topics.set_question_counts(runner.bank());

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|f| screens.topics.render(f)).unwrap();

    assert!(screen_contains(&terminal, "Git  2 questions"));
    assert!(screen_contains(&terminal, "Shell  1 question"));
}

#[test]
fn test_question_screen_after_start() {
    let mut runner = QuizRunner::new(bank(), SessionSettings::default());
    let mut screens = Screens::new(1200);

    runner
        .handle(Command::ChooseTopic(TopicChoice::Topic("Git".to_string())), &mut screens)
        .unwrap();
    assert_eq!(runner.handle(Command::Start, &mut screens).unwrap(), Outcome::Started);

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|f| screens.question.render(f)).unwrap();

    assert!(screen_contains(&terminal, "20:00"));
    assert!(screen_contains(&terminal, "Question 1 / 2"));

    runner.handle(Command::Tick, &mut screens).unwrap();
    terminal.draw(|f| screens.question.render(f)).unwrap();
    assert!(screen_contains(&terminal, "19:59"));
}

#[test]
fn test_cursor_resets_when_next_question_repeats_prompt() {
    let bank = QuestionBank::parse(
        r#"[
            {"theme": "Drill", "type": "single", "question": "Pick the vowel", "options": ["b", "a", "c"], "answer": ["a"]},
            {"theme": "Drill", "type": "single", "question": "Pick the vowel", "options": ["e", "d", "f"], "answer": ["e"]}
        ]"#,
    )
    .unwrap();
    let mut runner = QuizRunner::new(bank, SessionSettings::default());
    let mut screens = Screens::new(1200);

    runner
        .handle(Command::ChooseTopic(TopicChoice::Topic("Drill".to_string())), &mut screens)
        .unwrap();
    runner.handle(Command::Start, &mut screens).unwrap();
    screens.question.cursor_down();
    screens.question.cursor_down();
    assert_eq!(screens.question.cursor(), 2);

    assert_eq!(runner.handle(Command::Next, &mut screens).unwrap(), Outcome::Updated);
    assert_eq!(screens.question.cursor(), 0);
}

#[test]
fn test_score_and_correction_screens() {
    let mut runner = QuizRunner::new(bank(), SessionSettings::default());
    let mut screens = Screens::new(1200);

    runner
        .handle(Command::ChooseTopic(TopicChoice::Topic("Shell".to_string())), &mut screens)
        .unwrap();
    runner.handle(Command::Start, &mut screens).unwrap();
    runner.handle(Command::Submit, &mut screens).unwrap();

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|f| screens.score.render(f)).unwrap();
    assert!(screen_contains(&terminal, "0 / 1 (0%)"));
    assert!(screen_contains(&terminal, "Show Correction"));

    runner.handle(Command::ShowCorrection, &mut screens).unwrap();
    assert_eq!(screens.correction.reviews().len(), 1);

    terminal.draw(|f| screens.correction.render(f)).unwrap();
    assert!(screen_contains(&terminal, "Which are pagers?"));
    assert!(screen_contains(&terminal, "(no answer)"));
}

#[test]
fn test_load_failed_screen_shows_message() {
    let screens = Screens::new(1200);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|f| screens.topics.render_load_failed(f, "questions.json is missing"))
        .unwrap();
    assert!(screen_contains(&terminal, "questions.json is missing"));
}

#[test]
fn test_state_manager_flow() {
    let mut state_manager = StateManager::new();
    assert_eq!(state_manager.current_state(), AppState::Loading);

    state_manager.transition_to(AppState::Topics);
    state_manager.transition_to(AppState::Quiz);
    state_manager.transition_to(AppState::Score);
    state_manager.transition_to(AppState::Correction);

    state_manager.go_back();
    assert_eq!(state_manager.current_state(), AppState::Score);

    // Score has nothing behind it
    state_manager.go_back();
    assert_eq!(state_manager.current_state(), AppState::Score);
}

#[test]
fn test_key_mapping_covers_quiz_actions() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let press = |c| StateManager::key_to_navigation(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    assert_eq!(press('s'), NavigationAction::Submit);
    assert_eq!(press('r'), NavigationAction::Restart);
    assert_eq!(press('c'), NavigationAction::Correction);
    assert_eq!(press(' '), NavigationAction::Select);
}
