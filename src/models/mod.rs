//! Data models module
//!
//! Contains question records, recorded answers, scores and the
//! per-question correction view.

pub mod question;
pub mod score;

// Re-export commonly used types
pub use question::{AnswerInput, Question, QuestionKind, Response, TopicChoice};
pub use score::{OptionMark, QuestionReview, ReviewedOption, ScoreResult};
