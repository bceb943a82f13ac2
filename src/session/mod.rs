//! Quiz session state machine
//!
//! Owns the questions of one play-through, the recorded answers, the
//! countdown value and the scoring. Everything here is synchronous and
//! headless; front ends drive it through [`runner::QuizRunner`].

pub mod countdown;
pub mod runner;
pub mod shuffle;

pub use countdown::Countdown;
pub use runner::{Command, Outcome, QuizRunner, Renderer};

use crate::models::{
    question::is_permutation, AnswerInput, Question, QuestionKind, QuestionReview, Response,
    ScoreResult, TopicChoice,
};
use crate::{QuizError, Result, DEFAULT_TIME_LIMIT_SECS, RANDOM_SAMPLE_SIZE};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No questions drawn yet
    #[default]
    NotStarted,
    /// Questions are being answered
    InProgress,
    /// Scored; only `reset` leaves this state
    Finished,
}

/// Fixed parameters of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Countdown budget in seconds
    pub time_limit_secs: u32,
    /// Questions drawn in random mode
    pub random_sample_size: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            random_sample_size: RANDOM_SAMPLE_SIZE,
        }
    }
}

/// Result of one tap in the swap protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The item is now armed
    Armed(usize),
    /// The armed item was tapped again
    Disarmed,
    /// The two positions were exchanged and the arrangement recorded
    Swapped(usize, usize),
    /// Not an ordering question, out of range, or no session running
    Ignored,
}

/// One play-through of the quiz
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    settings: SessionSettings,
    state: SessionState,
    questions: Vec<Question>,
    current: usize,
    responses: BTreeMap<usize, Response>,
    remaining_secs: u32,
    armed: Option<usize>,
    score: Option<ScoreResult>,
}

impl QuizSession {
    /// Create a session that has not started yet
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            remaining_secs: settings.time_limit_secs,
            ..Self::default()
        }
    }

    /// Draw the questions for `choice` and start the session
    pub fn start(&mut self, choice: Option<&TopicChoice>, all: &[Question]) -> Result<()> {
        self.start_with_rng(choice, all, &mut rand::thread_rng())
    }

    /// Same as [`start`](Self::start) with an explicit random source
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        choice: Option<&TopicChoice>,
        all: &[Question],
        rng: &mut R,
    ) -> Result<()> {
        if self.state != SessionState::NotStarted {
            return Err(QuizError::SessionError(
                "session already started; reset it first".to_string(),
            ));
        }

        let choice = choice.ok_or(QuizError::SelectionError)?;

        let mut selected = match choice {
            TopicChoice::Random => {
                let mut pool = shuffle::shuffled(all, rng);
                pool.truncate(self.settings.random_sample_size);
                pool
            }
            TopicChoice::Topic(topic) => {
                let mut pool: Vec<Question> =
                    all.iter().filter(|q| &q.topic == topic).cloned().collect();
                shuffle::fisher_yates(&mut pool, rng);
                pool
            }
        };

        if selected.is_empty() {
            return Err(QuizError::EmptyTopicError(choice.label().to_string()));
        }

        for question in selected.iter_mut().filter(|q| q.kind.shuffles_options()) {
            shuffle::fisher_yates(&mut question.options, rng);
        }

        info!(topic = %choice, questions = selected.len(), "session started");

        self.questions = selected;
        self.current = 0;
        self.responses.clear();
        self.remaining_secs = self.settings.time_limit_secs;
        self.armed = None;
        self.score = None;
        self.state = SessionState::InProgress;
        Ok(())
    }

    /// Apply type-specific capture semantics and store the answer at `index`.
    ///
    /// Inputs that do not fit the question kind, unknown indices and calls
    /// outside a running session are ignored.
    pub fn record_answer(&mut self, index: usize, input: AnswerInput) {
        if self.state != SessionState::InProgress {
            debug!(index, "answer ignored: session not in progress");
            return;
        }
        let Some(question) = self.questions.get(index) else {
            debug!(index, "answer ignored: no such question");
            return;
        };

        match (question.kind, input) {
            (QuestionKind::Single, AnswerInput::Select(value)) => {
                self.responses.insert(index, Response::Selected(vec![value]));
            }
            (QuestionKind::Multiple, AnswerInput::Toggle(value)) => {
                let entry = self
                    .responses
                    .entry(index)
                    .or_insert_with(|| Response::Selected(Vec::new()));
                if let Response::Selected(chosen) = entry {
                    if let Some(pos) = chosen.iter().position(|v| v == &value) {
                        chosen.remove(pos);
                    } else {
                        chosen.push(value);
                    }
                }
            }
            (QuestionKind::Order, AnswerInput::Arrange(sequence)) => {
                if is_permutation(&sequence, &question.options) {
                    self.responses.insert(index, Response::Arranged(sequence));
                } else {
                    debug!(index, "arrangement ignored: not a permutation of the options");
                }
            }
            (kind, input) => {
                debug!(index, ?kind, ?input, "answer ignored: input does not match kind");
            }
        }
    }

    /// Two-step swap selection on the current ordering question
    pub fn tap(&mut self, position: usize) -> TapOutcome {
        if !self.current_is_order() || position >= self.current_arrangement_len() {
            return TapOutcome::Ignored;
        }

        match self.armed {
            None => {
                self.armed = Some(position);
                TapOutcome::Armed(position)
            }
            Some(armed) if armed == position => {
                self.armed = None;
                TapOutcome::Disarmed
            }
            Some(armed) => {
                self.armed = None;
                self.swap(armed, position)
            }
        }
    }

    /// Exchange two positions of the current ordering question and record
    /// the resulting arrangement
    pub fn swap(&mut self, a: usize, b: usize) -> TapOutcome {
        let len = self.current_arrangement_len();
        if !self.current_is_order() || a >= len || b >= len || a == b {
            return TapOutcome::Ignored;
        }

        let mut sequence = self.arrangement(self.current).to_vec();
        sequence.swap(a, b);
        self.armed = None;
        self.record_answer(self.current, AnswerInput::Arrange(sequence));
        TapOutcome::Swapped(a, b)
    }

    /// Move by `delta` questions, clamped to the session bounds
    pub fn go_to(&mut self, delta: isize) {
        if self.questions.is_empty() {
            return;
        }
        let last = self.questions.len() - 1;
        let target = self.current.saturating_add_signed(delta).min(last);
        if target != self.current {
            self.current = target;
            self.armed = None;
        }
    }

    /// Move to the next question, if any
    pub fn next(&mut self) {
        self.go_to(1);
    }

    /// Move to the previous question, if any
    pub fn prev(&mut self) {
        self.go_to(-1);
    }

    /// Count down one second; finishes the session when time runs out
    pub fn tick(&mut self) -> Option<ScoreResult> {
        if self.state != SessionState::InProgress {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            info!("time is up");
            Some(self.finish())
        } else {
            None
        }
    }

    /// Score the session. Calling it again returns the same result.
    pub fn finish(&mut self) -> ScoreResult {
        if let Some(score) = self.score {
            return score;
        }
        if self.state == SessionState::NotStarted {
            return ScoreResult::default();
        }

        let score = ScoreResult::compute(&self.questions, |i| self.responses.get(&i));
        info!(
            correct = score.correct,
            total = score.total,
            remaining_secs = self.remaining_secs,
            "session finished"
        );
        self.score = Some(score);
        self.armed = None;
        self.state = SessionState::Finished;
        score
    }

    /// Per-question review of the session
    pub fn build_correction(&self) -> Vec<QuestionReview> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionReview::new(i + 1, q, self.responses.get(&i)))
            .collect()
    }

    /// Discard everything and go back to `NotStarted`
    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Get the session settings
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Questions drawn for this session, in presentation order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in the session
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the session holds no question
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the displayed question
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The displayed question, if the session has any
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Whether the displayed question is the last one
    pub fn is_last(&self) -> bool {
        !self.questions.is_empty() && self.current == self.questions.len() - 1
    }

    /// Seconds left on the countdown
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Recorded answer for question `index`
    pub fn response(&self, index: usize) -> Option<&Response> {
        self.responses.get(&index)
    }

    /// Arrangement of question `index`: recorded or starting order
    pub fn arrangement(&self, index: usize) -> &[String] {
        match self.questions.get(index) {
            Some(q) => q.arrangement(self.responses.get(&index)),
            None => &[],
        }
    }

    /// Armed position of the swap protocol
    pub fn armed(&self) -> Option<usize> {
        self.armed
    }

    /// Number of questions with a recorded answer
    pub fn answered_count(&self) -> usize {
        self.responses.len()
    }

    /// Cached score once finished
    pub fn score(&self) -> Option<ScoreResult> {
        self.score
    }

    fn current_is_order(&self) -> bool {
        self.state == SessionState::InProgress
            && self
                .current_question()
                .is_some_and(|q| q.kind == QuestionKind::Order)
    }

    fn current_arrangement_len(&self) -> usize {
        self.arrangement(self.current).len()
    }
}
