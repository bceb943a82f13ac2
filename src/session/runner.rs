//! Command dispatch between front ends and the session
//!
//! Front ends turn user input into [`Command`]s and implement [`Renderer`].
//! [`QuizRunner`] applies each command to the session and pushes whatever
//! changed back through the renderer.

use crate::bank::QuestionBank;
use crate::models::{AnswerInput, Question, QuestionKind, QuestionReview, Response, ScoreResult, TopicChoice};
use crate::session::{QuizSession, SessionSettings, SessionState, TapOutcome};
use crate::Result;
use tracing::debug;

/// User and timer events consumed by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Highlight a topic for the next start
    ChooseTopic(TopicChoice),
    /// Start a session with the chosen topic
    Start,
    /// Select, toggle or tap the option at this position of the current question
    Toggle(usize),
    /// Swap-protocol tap on an ordering question
    Tap(usize),
    /// Exchange two items of an ordering question directly
    Swap(usize, usize),
    /// Go to the next question
    Next,
    /// Go to the previous question
    Prev,
    /// Finish and score the session
    Submit,
    /// Show the per-question review
    ShowCorrection,
    /// Drop the session and return to topic selection
    Restart,
    /// One second elapsed
    Tick,
}

/// What a command did, as far as the front end cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A session began; start the countdown
    Started,
    /// Something visible changed
    Updated,
    /// The session was scored; stop the countdown
    Finished(ScoreResult),
    /// Back to topic selection; stop the countdown
    Reset,
    /// The command does not apply in the current state
    Ignored,
}

/// Presentation boundary called by the runner
pub trait Renderer {
    /// Show the selectable topics, highlighting `selected`
    fn render_topic_list(&mut self, topics: &[TopicChoice], selected: Option<&TopicChoice>);

    /// Show a question with what was recorded for it so far
    fn render_question(&mut self, question: &Question, response: Option<&Response>, armed: Option<usize>);

    /// Show the remaining time
    fn render_timer(&mut self, remaining_secs: u32);

    /// Show the position in the session (0-based `current`)
    fn render_progress(&mut self, current: usize, total: usize);

    /// Show the final score
    fn render_score(&mut self, result: &ScoreResult);

    /// Show the answer review. Optional; ignored by default.
    fn render_correction(&mut self, _reviews: &[QuestionReview]) {}
}

/// Owns the bank, the topic selection and the active session
#[derive(Debug)]
pub struct QuizRunner {
    bank: QuestionBank,
    topics: Vec<TopicChoice>,
    selection: Option<TopicChoice>,
    session: QuizSession,
}

impl QuizRunner {
    /// Create a runner over a loaded bank
    pub fn new(bank: QuestionBank, settings: SessionSettings) -> Self {
        let topics = bank.distinct_topics();
        Self {
            bank,
            topics,
            selection: None,
            session: QuizSession::new(settings),
        }
    }

    /// Get the question bank
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Selectable topics, random pseudo-topic last
    pub fn topics(&self) -> &[TopicChoice] {
        &self.topics
    }

    /// Currently chosen topic
    pub fn selection(&self) -> Option<&TopicChoice> {
        self.selection.as_ref()
    }

    /// Get the active session
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Draw the initial topic screen
    pub fn show_topics<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render_topic_list(&self.topics, self.selection.as_ref());
    }

    /// Apply one command.
    ///
    /// Only `Start` can fail, with `SelectionError` or `EmptyTopicError`;
    /// the session stays untouched in that case.
    pub fn handle<R: Renderer + ?Sized>(&mut self, command: Command, renderer: &mut R) -> Result<Outcome> {
        let state = self.session.state();
        let outcome = match (state, command) {
            (SessionState::NotStarted, Command::ChooseTopic(choice)) => {
                self.selection = Some(choice);
                self.show_topics(renderer);
                Outcome::Updated
            }
            (SessionState::NotStarted, Command::Start) => {
                self.session.start(self.selection.as_ref(), self.bank.questions())?;
                self.render_current(renderer);
                renderer.render_timer(self.session.remaining_secs());
                Outcome::Started
            }
            (SessionState::InProgress, Command::Toggle(position)) => self.toggle(position, renderer),
            (SessionState::InProgress, Command::Tap(position)) => {
                let tapped = self.session.tap(position);
                self.after_tap(tapped, renderer)
            }
            (SessionState::InProgress, Command::Swap(a, b)) => {
                let swapped = self.session.swap(a, b);
                self.after_tap(swapped, renderer)
            }
            (SessionState::InProgress, Command::Next) => self.navigate(1, renderer),
            (SessionState::InProgress, Command::Prev) => self.navigate(-1, renderer),
            (SessionState::InProgress, Command::Submit) => {
                let score = self.session.finish();
                renderer.render_score(&score);
                Outcome::Finished(score)
            }
            (SessionState::InProgress, Command::Tick) => match self.session.tick() {
                Some(score) => {
                    renderer.render_timer(self.session.remaining_secs());
                    renderer.render_score(&score);
                    Outcome::Finished(score)
                }
                None => {
                    renderer.render_timer(self.session.remaining_secs());
                    Outcome::Updated
                }
            },
            (SessionState::Finished, Command::ShowCorrection) => {
                renderer.render_correction(&self.session.build_correction());
                Outcome::Updated
            }
            (SessionState::InProgress | SessionState::Finished, Command::Restart) => {
                self.session.reset();
                self.show_topics(renderer);
                Outcome::Reset
            }
            (state, command) => {
                debug!(?state, ?command, "command ignored");
                Outcome::Ignored
            }
        };
        Ok(outcome)
    }

    fn toggle<R: Renderer + ?Sized>(&mut self, position: usize, renderer: &mut R) -> Outcome {
        let index = self.session.current_index();
        let Some((kind, value)) = self
            .session
            .current_question()
            .map(|q| (q.kind, q.options.get(position).cloned()))
        else {
            return Outcome::Ignored;
        };

        match kind {
            QuestionKind::Order => {
                let tapped = self.session.tap(position);
                self.after_tap(tapped, renderer)
            }
            kind => {
                let Some(value) = value else {
                    return Outcome::Ignored;
                };
                let input = if kind == QuestionKind::Single {
                    AnswerInput::Select(value)
                } else {
                    AnswerInput::Toggle(value)
                };
                self.session.record_answer(index, input);
                self.render_current(renderer);
                Outcome::Updated
            }
        }
    }

    fn after_tap<R: Renderer + ?Sized>(&mut self, tapped: TapOutcome, renderer: &mut R) -> Outcome {
        if tapped == TapOutcome::Ignored {
            return Outcome::Ignored;
        }
        self.render_current(renderer);
        Outcome::Updated
    }

    fn navigate<R: Renderer + ?Sized>(&mut self, delta: isize, renderer: &mut R) -> Outcome {
        let before = self.session.current_index();
        self.session.go_to(delta);
        if self.session.current_index() == before {
            return Outcome::Ignored;
        }
        self.render_current(renderer);
        Outcome::Updated
    }

    fn render_current<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        let index = self.session.current_index();
        if let Some(question) = self.session.current_question() {
            renderer.render_question(question, self.session.response(index), self.session.armed());
            renderer.render_progress(index, self.session.len());
        }
    }
}
