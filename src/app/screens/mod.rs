//! TUI screen components
//!
//! Contains individual screen implementations for different application states.
//! [`Screens`] bundles them and is the renderer the runner draws into.

pub mod correction;
pub mod question;
pub mod score;
pub mod topics;

pub use correction::CorrectionScreen;
pub use question::QuestionScreen;
pub use score::{ScoreAction, ScoreScreen};
pub use topics::TopicsScreen;

use crate::models::{Question, QuestionReview, Response, ScoreResult, TopicChoice};
use crate::session::Renderer;

/// All screens of the terminal front end
#[derive(Debug, Default)]
pub struct Screens {
    pub topics: TopicsScreen,
    pub question: QuestionScreen,
    pub score: ScoreScreen,
    pub correction: CorrectionScreen,
}

impl Screens {
    /// Create the screen set for a session time limit
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            topics: TopicsScreen::new(),
            question: QuestionScreen::new(time_limit_secs),
            score: ScoreScreen::new(),
            correction: CorrectionScreen::new(),
        }
    }
}

impl Renderer for Screens {
    fn render_topic_list(&mut self, topics: &[TopicChoice], selected: Option<&TopicChoice>) {
        self.topics.set_topics(topics, selected);
    }

    fn render_question(&mut self, question: &Question, response: Option<&Response>, armed: Option<usize>) {
        self.question.set_question(question, response, armed);
    }

    fn render_timer(&mut self, remaining_secs: u32) {
        self.question.set_remaining(remaining_secs);
    }

    fn render_progress(&mut self, current: usize, total: usize) {
        self.question.set_progress(current, total);
    }

    fn render_score(&mut self, result: &ScoreResult) {
        self.score.set_result(*result);
    }

    fn render_correction(&mut self, reviews: &[QuestionReview]) {
        self.correction.set_reviews(reviews.to_vec());
    }
}
