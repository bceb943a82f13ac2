//! Line-mode front end
//!
//! A plain stdin/stdout quiz for pipes and terminals without full-screen
//! support. Progress and the countdown are shown with an indicatif bar.

use crate::bank::QuestionBank;
use crate::config::QuizConfig;
use crate::error;
use crate::models::{OptionMark, Question, QuestionKind, QuestionReview, Response, ScoreResult, TopicChoice};
use crate::session::{Command, Countdown, Outcome, QuizRunner, Renderer, SessionState};
use crate::util::format::{format_remaining, format_score};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// A 1-based number
    Number(usize),
    /// Two 1-based numbers, `a b`
    Pair(usize, usize),
    Next,
    Prev,
    Submit,
    Correction,
    Restart,
    Quit,
    Empty,
    Invalid(String),
}

/// Parse one line typed by the user
pub fn parse_console_input(line: &str) -> ConsoleInput {
    let line = line.trim();
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        [] => ConsoleInput::Empty,
        [word] => match word.to_ascii_lowercase().as_str() {
            "n" | "next" => ConsoleInput::Next,
            "p" | "prev" => ConsoleInput::Prev,
            "s" | "submit" => ConsoleInput::Submit,
            "c" | "correction" => ConsoleInput::Correction,
            "r" | "restart" => ConsoleInput::Restart,
            "q" | "quit" => ConsoleInput::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => ConsoleInput::Number(n),
                _ => ConsoleInput::Invalid(line.to_string()),
            },
        },
        [a, b] => match (a.parse::<usize>(), b.parse::<usize>()) {
            (Ok(a), Ok(b)) if a > 0 && b > 0 => ConsoleInput::Pair(a, b),
            _ => ConsoleInput::Invalid(line.to_string()),
        },
        _ => ConsoleInput::Invalid(line.to_string()),
    }
}

/// What the loop should do with one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Send these commands in order
    Send(Vec<Command>),
    /// Print a hint and wait for the next line
    Hint(String),
    /// Leave the program
    Exit,
}

/// Translate an input line into commands for the current session state
pub fn step_for(state: SessionState, is_last: bool, topics: &[TopicChoice], input: ConsoleInput) -> Step {
    match (state, input) {
        (_, ConsoleInput::Empty) => Step::Send(Vec::new()),
        (_, ConsoleInput::Number(0)) => Step::Hint("Numbers start at 1".to_string()),
        (_, ConsoleInput::Pair(a, b)) if a == 0 || b == 0 => Step::Hint("Numbers start at 1".to_string()),
        (SessionState::NotStarted, ConsoleInput::Number(n)) => match topics.get(n - 1) {
            Some(topic) => Step::Send(vec![Command::ChooseTopic(topic.clone()), Command::Start]),
            None => Step::Hint(format!("Pick a topic between 1 and {}", topics.len())),
        },
        (SessionState::NotStarted, ConsoleInput::Quit) => Step::Exit,
        (SessionState::NotStarted, _) => Step::Hint("Type a topic number, or q to quit".to_string()),

        (SessionState::InProgress, ConsoleInput::Number(n)) => Step::Send(vec![Command::Toggle(n - 1)]),
        (SessionState::InProgress, ConsoleInput::Pair(a, b)) => Step::Send(vec![Command::Swap(a - 1, b - 1)]),
        (SessionState::InProgress, ConsoleInput::Next) => Step::Send(vec![Command::Next]),
        (SessionState::InProgress, ConsoleInput::Prev) => Step::Send(vec![Command::Prev]),
        (SessionState::InProgress, ConsoleInput::Submit) if is_last => Step::Send(vec![Command::Submit]),
        (SessionState::InProgress, ConsoleInput::Submit) => {
            Step::Hint("Submit is available on the last question (q submits now)".to_string())
        }
        (SessionState::InProgress, ConsoleInput::Quit) => Step::Send(vec![Command::Submit]),
        (SessionState::InProgress, ConsoleInput::Restart) => Step::Send(vec![Command::Restart]),
        (SessionState::InProgress, _) => {
            Step::Hint("Type an option number, `a b` to swap, n, p, s, r or q".to_string())
        }

        (SessionState::Finished, ConsoleInput::Correction) => Step::Send(vec![Command::ShowCorrection]),
        (SessionState::Finished, ConsoleInput::Restart) => Step::Send(vec![Command::Restart]),
        (SessionState::Finished, ConsoleInput::Quit) => Step::Exit,
        (SessionState::Finished, _) => Step::Hint("Type c, r or q".to_string()),
    }
}

/// Renderer printing to a writer with an optional progress bar
pub struct ConsoleRenderer<W: Write> {
    out: W,
    bar: Option<ProgressBar>,
    show_bar: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Create a renderer. `show_bar` false keeps the bar hidden.
    pub fn new(out: W, show_bar: bool) -> Self {
        Self {
            out,
            bar: None,
            show_bar,
        }
    }

    /// Get the underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Print one line, suspending the bar while writing
    pub fn say(&mut self, text: &str) {
        let out = &mut self.out;
        let written = match &self.bar {
            Some(bar) => bar.suspend(|| writeln!(out, "{}", text)),
            None => writeln!(out, "{}", text),
        };
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            debug!(error = %e, "console write failed");
        }
    }

    fn progress_bar(&mut self, total: u64) -> &ProgressBar {
        let show_bar = self.show_bar;
        self.bar.get_or_insert_with(|| {
            let bar = if show_bar {
                ProgressBar::new(total)
            } else {
                ProgressBar::hidden()
            };
            bar.set_style(
                ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        })
    }

    fn finish_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render_topic_list(&mut self, topics: &[TopicChoice], selected: Option<&TopicChoice>) {
        self.finish_bar();
        self.say("");
        self.say("Topics:");
        for (i, topic) in topics.iter().enumerate() {
            let marker = if selected == Some(topic) { "*" } else { " " };
            self.say(&format!("{} {:>2}. {}", marker, i + 1, topic.label()));
        }
        self.say("Choose a topic number (q to quit):");
    }

    fn render_question(&mut self, question: &Question, response: Option<&Response>, armed: Option<usize>) {
        self.say("");
        self.say(&format!("[{}] {}", question.topic, question.kind.description()));
        self.say(&question.prompt);

        match question.kind {
            QuestionKind::Order => {
                for (i, item) in question.arrangement(response).iter().enumerate() {
                    let marker = if armed == Some(i) { "*" } else { " " };
                    self.say(&format!("{} {:>2}. {}", marker, i + 1, item));
                }
                self.say("Type two numbers to swap them, or one number then another.");
            }
            kind => {
                for (i, option) in question.options.iter().enumerate() {
                    let chosen = response.is_some_and(|r| r.contains(option));
                    let marker = match (kind, chosen) {
                        (QuestionKind::Single, true) => "(•)",
                        (QuestionKind::Single, false) => "( )",
                        (_, true) => "[x]",
                        (_, false) => "[ ]",
                    };
                    self.say(&format!("{:>2}. {} {}", i + 1, marker, option));
                }
            }
        }
    }

    fn render_timer(&mut self, remaining_secs: u32) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} left", format_remaining(remaining_secs)));
        }
    }

    fn render_progress(&mut self, current: usize, total: usize) {
        let bar = self.progress_bar(total as u64);
        bar.set_length(total as u64);
        bar.set_position(current as u64 + 1);
    }

    fn render_score(&mut self, result: &ScoreResult) {
        self.finish_bar();
        self.say("");
        self.say(&format!("Score: {}", format_score(result)));
        self.say("[c] correction  [r] restart  [q] quit");
    }

    fn render_correction(&mut self, reviews: &[QuestionReview]) {
        for review in reviews {
            let mark = if review.is_correct { "✓" } else { "✗" };
            self.say("");
            self.say(&format!("{} {}. {}", mark, review.number, review.prompt));
            for (i, option) in review.options.iter().enumerate() {
                let verdict = match option.mark {
                    OptionMark::Correct => "✓",
                    OptionMark::IncorrectlyChosen => "✗",
                    OptionMark::Neutral => " ",
                };
                let prefix = match review.kind {
                    QuestionKind::Order => format!("{:>2}.", i + 1),
                    _ if option.chosen => "[x]".to_string(),
                    _ => "[ ]".to_string(),
                };
                self.say(&format!("   {} {} {}", verdict, prefix, option.text));
            }
            let user = if review.user_answer.is_empty() {
                "(no answer)".to_string()
            } else {
                review.user_answer.join(", ")
            };
            self.say(&format!("   your answer:    {}", user));
            self.say(&format!("   correct answer: {}", review.correct_answer.join(", ")));
        }
        self.say("");
        self.say("[r] restart  [q] quit");
    }
}

/// Run the quiz in line mode until the user quits or stdin closes
pub async fn run_console(config: QuizConfig) -> Result<()> {
    let bank = QuestionBank::load(&config.questions_path).await?;
    let mut runner = QuizRunner::new(bank, config.session_settings());
    let mut renderer = ConsoleRenderer::new(io::stdout(), true);

    let (tick_tx, mut tick_rx) = mpsc::channel::<()>(16);
    let mut countdown = Countdown::idle();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    runner.show_topics(&mut renderer);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                let session = runner.session();
                let step = step_for(session.state(), session.is_last(), runner.topics(), parse_console_input(&line));

                match step {
                    Step::Exit => break,
                    Step::Hint(hint) => renderer.say(&hint),
                    Step::Send(commands) => {
                        for command in commands {
                            let outcome = match runner.handle(command, &mut renderer) {
                                Ok(outcome) => outcome,
                                Err(e) if error::is_recoverable(&e) => {
                                    warn!(error = %e, "command rejected");
                                    renderer.say(&error::user_friendly_message(&e));
                                    break;
                                }
                                Err(e) => return Err(e),
                            };
                            follow_outcome(outcome, &config, &mut countdown, &tick_tx, &mut tick_rx);
                        }
                    }
                }
            }
            Some(()) = tick_rx.recv() => {
                let outcome = runner.handle(Command::Tick, &mut renderer)?;
                if let Outcome::Finished(_) = outcome {
                    renderer.say("Time is up.");
                }
                follow_outcome(outcome, &config, &mut countdown, &tick_tx, &mut tick_rx);
            }
        }
    }

    countdown.shutdown().await;
    Ok(())
}

/// Start or stop the countdown after a command
fn follow_outcome(
    outcome: Outcome,
    config: &QuizConfig,
    countdown: &mut Countdown,
    tick_tx: &mpsc::Sender<()>,
    tick_rx: &mut mpsc::Receiver<()>,
) {
    match outcome {
        Outcome::Started => {
            while tick_rx.try_recv().is_ok() {}
            *countdown = Countdown::start(config.tick_interval(), tick_tx.clone());
        }
        Outcome::Finished(_) | Outcome::Reset => countdown.stop(),
        Outcome::Updated | Outcome::Ignored => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> Vec<TopicChoice> {
        vec![TopicChoice::Topic("Rust".to_string()), TopicChoice::Random]
    }

    fn output(renderer: &ConsoleRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.writer()).into_owned()
    }

    #[test]
    fn test_parse_console_input() {
        assert_eq!(parse_console_input("  3 "), ConsoleInput::Number(3));
        assert_eq!(parse_console_input("1 4"), ConsoleInput::Pair(1, 4));
        assert_eq!(parse_console_input("N"), ConsoleInput::Next);
        assert_eq!(parse_console_input("prev"), ConsoleInput::Prev);
        assert_eq!(parse_console_input("q"), ConsoleInput::Quit);
        assert_eq!(parse_console_input(""), ConsoleInput::Empty);
        assert_eq!(parse_console_input("0"), ConsoleInput::Invalid("0".to_string()));
        assert_eq!(parse_console_input("1 2 3"), ConsoleInput::Invalid("1 2 3".to_string()));
        assert_eq!(parse_console_input("maybe"), ConsoleInput::Invalid("maybe".to_string()));
    }

    #[test]
    fn test_topic_steps() {
        let topics = topics();
        assert_eq!(
            step_for(SessionState::NotStarted, false, &topics, ConsoleInput::Number(2)),
            Step::Send(vec![Command::ChooseTopic(TopicChoice::Random), Command::Start])
        );
        assert!(matches!(
            step_for(SessionState::NotStarted, false, &topics, ConsoleInput::Number(3)),
            Step::Hint(_)
        ));
        assert_eq!(
            step_for(SessionState::NotStarted, false, &topics, ConsoleInput::Quit),
            Step::Exit
        );
    }

    #[test]
    fn test_quiz_steps() {
        let topics = topics();
        assert_eq!(
            step_for(SessionState::InProgress, false, &topics, ConsoleInput::Number(1)),
            Step::Send(vec![Command::Toggle(0)])
        );
        assert_eq!(
            step_for(SessionState::InProgress, false, &topics, ConsoleInput::Pair(1, 3)),
            Step::Send(vec![Command::Swap(0, 2)])
        );
        assert!(matches!(
            step_for(SessionState::InProgress, false, &topics, ConsoleInput::Submit),
            Step::Hint(_)
        ));
        assert_eq!(
            step_for(SessionState::InProgress, true, &topics, ConsoleInput::Submit),
            Step::Send(vec![Command::Submit])
        );
        // Quitting mid-quiz submits what was answered
        assert_eq!(
            step_for(SessionState::InProgress, false, &topics, ConsoleInput::Quit),
            Step::Send(vec![Command::Submit])
        );
    }

    #[test]
    fn test_finished_steps() {
        let topics = topics();
        assert_eq!(
            step_for(SessionState::Finished, true, &topics, ConsoleInput::Correction),
            Step::Send(vec![Command::ShowCorrection])
        );
        assert_eq!(
            step_for(SessionState::Finished, true, &topics, ConsoleInput::Quit),
            Step::Exit
        );
    }

    #[test]
    fn test_renderer_output() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), false);
        let topics = topics();
        renderer.render_topic_list(&topics, Some(&topics[0]));

        let question = Question {
            topic: "Rust".to_string(),
            kind: QuestionKind::Multiple,
            prompt: "Pick the integer types".to_string(),
            options: vec!["u8".to_string(), "f32".to_string(), "i64".to_string()],
            answer: vec!["u8".to_string(), "i64".to_string()],
        };
        renderer.render_progress(0, 1);
        renderer.render_timer(90);
        renderer.render_question(&question, Some(&Response::Selected(vec!["u8".to_string()])), None);
        renderer.render_score(&ScoreResult { correct: 0, total: 1 });

        let text = output(&renderer);
        assert!(text.contains("*  1. Rust"));
        assert!(text.contains(" 1. [x] u8"));
        assert!(text.contains(" 2. [ ] f32"));
        assert!(text.contains("Score: 0 / 1 (0%)"));
    }

    #[test]
    fn test_order_render_marks_armed() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), false);
        let question = Question {
            topic: "Rust".to_string(),
            kind: QuestionKind::Order,
            prompt: "Order the build steps".to_string(),
            options: vec!["link".to_string(), "parse".to_string()],
            answer: vec!["parse".to_string(), "link".to_string()],
        };
        renderer.render_question(&question, None, Some(1));
        let text = output(&renderer);
        assert!(text.contains("   1. link"));
        assert!(text.contains("*  2. parse"));
    }

    #[test]
    fn test_correction_marks_each_option() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), false);
        let choice = Question {
            topic: "Rust".to_string(),
            kind: QuestionKind::Multiple,
            prompt: "Pick the integer types".to_string(),
            options: vec!["u8".to_string(), "f32".to_string(), "i64".to_string()],
            answer: vec!["u8".to_string(), "i64".to_string()],
        };
        let order = Question {
            topic: "Rust".to_string(),
            kind: QuestionKind::Order,
            prompt: "Order the build steps".to_string(),
            options: vec!["link".to_string(), "parse".to_string()],
            answer: vec!["parse".to_string(), "link".to_string()],
        };
        let picked = Response::Selected(vec!["u8".to_string(), "f32".to_string()]);
        let reviews = vec![
            QuestionReview::new(1, &choice, Some(&picked)),
            QuestionReview::new(2, &order, None),
        ];
        renderer.render_correction(&reviews);

        let text = output(&renderer);
        assert!(text.contains("✗ 1. Pick the integer types"));
        assert!(text.contains("   ✓ [x] u8"));
        assert!(text.contains("   ✗ [x] f32"));
        assert!(text.contains("   ✓ [ ] i64"));
        assert!(text.contains("   ✗  1. link"));
        assert!(text.contains("   ✗  2. parse"));
    }

    /// Poll until the countdown task has exited
    async fn wait_until_stopped(countdown: &Countdown) {
        for _ in 0..100 {
            if !countdown.is_running() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_follow_outcome_drives_countdown() {
        let config = QuizConfig {
            tick_interval_ms: 20,
            ..QuizConfig::default()
        };
        let (tick_tx, mut tick_rx) = mpsc::channel(16);
        let mut countdown = Countdown::idle();

        // A tick left over from an earlier session is dropped on start
        tick_tx.send(()).await.unwrap();
        follow_outcome(Outcome::Started, &config, &mut countdown, &tick_tx, &mut tick_rx);
        assert!(countdown.is_running());
        assert!(tick_rx.try_recv().is_err());

        let tick = tokio::time::timeout(std::time::Duration::from_secs(2), tick_rx.recv()).await;
        assert_eq!(tick.unwrap(), Some(()));

        let score = ScoreResult { correct: 1, total: 2 };
        follow_outcome(Outcome::Finished(score), &config, &mut countdown, &tick_tx, &mut tick_rx);
        wait_until_stopped(&countdown).await;
        assert!(!countdown.is_running());

        // Restart brings a fresh countdown up, reset takes it down again
        follow_outcome(Outcome::Started, &config, &mut countdown, &tick_tx, &mut tick_rx);
        assert!(countdown.is_running());
        follow_outcome(Outcome::Updated, &config, &mut countdown, &tick_tx, &mut tick_rx);
        assert!(countdown.is_running());
        follow_outcome(Outcome::Reset, &config, &mut countdown, &tick_tx, &mut tick_rx);
        wait_until_stopped(&countdown).await;
        assert!(!countdown.is_running());
    }
}
