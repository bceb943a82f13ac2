//! Question data models
//!
//! Question records as stored in the question file, their validation, and
//! the answers a user records against them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// How a question is answered and scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option is correct
    Single,
    /// Any non-empty subset of the options is correct
    Multiple,
    /// The options must be put in a specific order
    Order,
}

impl QuestionKind {
    /// Get a human-readable description of the kind
    pub fn description(&self) -> &'static str {
        match self {
            QuestionKind::Single => "Single choice",
            QuestionKind::Multiple => "Multiple choice",
            QuestionKind::Order => "Ordering",
        }
    }

    /// Whether the options are shuffled at session start
    pub fn shuffles_options(&self) -> bool {
        !matches!(self, QuestionKind::Order)
    }
}

/// A validated question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    #[serde(rename = "theme")]
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    /// Candidate set (Single/Multiple) or starting arrangement (Order)
    pub options: Vec<String>,
    /// Correct answer set (Single/Multiple) or sequence (Order)
    pub answer: Vec<String>,
}

/// Question record exactly as it appears in the question file
#[derive(Debug, Deserialize)]
struct RawQuestion {
    theme: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    question: String,
    options: Vec<String>,
    answer: Vec<String>,
}

impl TryFrom<RawQuestion> for Question {
    type Error = String;

    fn try_from(raw: RawQuestion) -> std::result::Result<Self, Self::Error> {
        let question = Question {
            topic: raw.theme,
            kind: raw.kind,
            prompt: raw.question,
            options: raw.options,
            answer: raw.answer,
        };
        question.validate()?;
        Ok(question)
    }
}

impl Question {
    /// Check the answer invariants for this question's kind
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.answer.is_empty() {
            return Err(format!("question '{}' has no answer", self.prompt));
        }

        if has_duplicates(&self.answer) {
            return Err(format!("question '{}' repeats an answer value", self.prompt));
        }

        if self.kind != QuestionKind::Order {
            if has_duplicates(&self.options) {
                return Err(format!("question '{}' repeats an option", self.prompt));
            }
            if let Some(missing) = self.answer.iter().find(|a| !self.options.contains(a)) {
                return Err(format!(
                    "question '{}' answer '{}' is not one of its options",
                    self.prompt, missing
                ));
            }
        }

        match self.kind {
            QuestionKind::Single if self.answer.len() != 1 => Err(format!(
                "single-choice question '{}' must have exactly one answer, found {}",
                self.prompt,
                self.answer.len()
            )),
            QuestionKind::Order if !is_permutation(&self.answer, &self.options) => Err(format!(
                "ordering question '{}' answer is not a permutation of its options",
                self.prompt
            )),
            _ => Ok(()),
        }
    }

    /// Whether `value` is part of the correct answer
    pub fn is_answer(&self, value: &str) -> bool {
        self.answer.iter().any(|a| a == value)
    }

    /// Score a recorded response against this question
    ///
    /// Choice questions use set equality, ordering questions an exact
    /// positional match. A missing response is never correct.
    pub fn is_correct(&self, response: Option<&Response>) -> bool {
        match (self.kind, response) {
            (QuestionKind::Single | QuestionKind::Multiple, Some(Response::Selected(chosen))) => {
                chosen.len() == self.answer.len()
                    && self.answer.iter().all(|a| chosen.contains(a))
            }
            (QuestionKind::Order, Some(Response::Arranged(sequence))) => {
                sequence == &self.answer
            }
            _ => false,
        }
    }

    /// Current arrangement of an ordering question: the recorded one, or the
    /// starting order when nothing was recorded yet
    pub fn arrangement<'a>(&'a self, response: Option<&'a Response>) -> &'a [String] {
        match response {
            Some(Response::Arranged(sequence)) => sequence,
            _ => &self.options,
        }
    }
}

/// A recorded answer for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Chosen options of a Single/Multiple question, without duplicates
    Selected(Vec<String>),
    /// Full arrangement of an Order question
    Arranged(Vec<String>),
}

impl Response {
    /// Values of the response in recorded order
    pub fn values(&self) -> &[String] {
        match self {
            Response::Selected(values) | Response::Arranged(values) => values,
        }
    }

    /// Whether `value` was chosen
    pub fn contains(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }
}

/// Payload of an answer-capture event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    /// Single choice: replace the selection with this value
    Select(String),
    /// Multiple choice: add the value, or remove it if already chosen
    Toggle(String),
    /// Ordering: the full arrangement after a swap
    Arrange(Vec<String>),
}

/// A topic the user can start a session with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicChoice {
    /// Questions of one topic
    Topic(String),
    /// A random sample across all topics
    Random,
}

impl TopicChoice {
    /// Label shown in topic lists
    pub fn label(&self) -> &str {
        match self {
            TopicChoice::Topic(name) => name,
            TopicChoice::Random => "Random (all questions)",
        }
    }
}

impl fmt::Display for TopicChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn has_duplicates(items: &[String]) -> bool {
    let mut seen = HashSet::new();
    !items.iter().all(|item| seen.insert(item.as_str()))
}

/// Multiset equality of two string sequences
pub(crate) fn is_permutation(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&str, isize> = HashMap::new();
    for item in a {
        *counts.entry(item).or_default() += 1;
    }
    for item in b {
        *counts.entry(item).or_default() -= 1;
    }
    counts.values().all(|&c| c == 0)
}
