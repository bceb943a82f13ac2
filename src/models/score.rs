//! Score and correction data models

use crate::models::question::{Question, QuestionKind, Response};
use serde::{Deserialize, Serialize};

/// Final score of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Number of correctly answered questions
    pub correct: usize,
    /// Number of questions in the session
    pub total: usize,
}

impl ScoreResult {
    /// Score the given questions against their recorded responses
    pub fn compute<'a, F>(questions: &[Question], response: F) -> Self
    where
        F: Fn(usize) -> Option<&'a Response>,
    {
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(i, q)| q.is_correct(response(*i)))
            .count();

        Self {
            correct,
            total: questions.len(),
        }
    }

    /// Share of correct answers in percent (0 for an empty session)
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

/// How an option is shown on the correction screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionMark {
    /// Part of the answer (or in the right position for ordering)
    Correct,
    /// Chosen but not part of the answer (or misplaced for ordering)
    IncorrectlyChosen,
    /// Neither chosen nor correct
    Neutral,
}

/// One option line of a question review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewedOption {
    pub text: String,
    pub mark: OptionMark,
    /// Whether the user chose this option
    pub chosen: bool,
}

/// Correction entry for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    /// 1-based position in the session
    pub number: usize,
    pub prompt: String,
    pub kind: QuestionKind,
    pub user_answer: Vec<String>,
    pub correct_answer: Vec<String>,
    pub options: Vec<ReviewedOption>,
    pub is_correct: bool,
}

impl QuestionReview {
    /// Build the review of `question` given what the user recorded
    pub fn new(number: usize, question: &Question, response: Option<&Response>) -> Self {
        let user_answer: Vec<String> = response.map(|r| r.values().to_vec()).unwrap_or_default();

        let options = match question.kind {
            QuestionKind::Single | QuestionKind::Multiple => question
                .options
                .iter()
                .map(|opt| {
                    let chosen = user_answer.contains(opt);
                    let mark = if question.is_answer(opt) {
                        OptionMark::Correct
                    } else if chosen {
                        OptionMark::IncorrectlyChosen
                    } else {
                        OptionMark::Neutral
                    };
                    ReviewedOption {
                        text: opt.clone(),
                        mark,
                        chosen,
                    }
                })
                .collect(),
            QuestionKind::Order => question
                .arrangement(response)
                .iter()
                .zip(question.answer.iter())
                .map(|(placed, expected)| ReviewedOption {
                    text: placed.clone(),
                    mark: if placed == expected {
                        OptionMark::Correct
                    } else {
                        OptionMark::IncorrectlyChosen
                    },
                    chosen: true,
                })
                .collect(),
        };

        Self {
            number,
            prompt: question.prompt.clone(),
            kind: question.kind,
            user_answer,
            correct_answer: question.answer.clone(),
            options,
            is_correct: question.is_correct(response),
        }
    }
}
