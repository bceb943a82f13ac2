//! Question bank
//!
//! Holds the full question set loaded at startup and derives the topic list
//! used for selection.

use crate::models::{Question, TopicChoice};
use crate::{QuizError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// The loaded question set
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Create a bank from already validated questions
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse a JSON question document
    ///
    /// The document is an array of `{theme, type, question, options, answer}`
    /// records. Any invalid record fails the whole load, naming its index.
    pub fn parse(source: &str) -> Result<Self> {
        let records: Vec<serde_json::Value> = serde_json::from_str(source)?;

        let questions = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                serde_json::from_value::<Question>(record).map_err(|e| {
                    QuizError::DataLoadError(format!("question #{}: {}", i + 1, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { questions })
    }

    /// Read and parse the question file at `path`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            QuizError::DataLoadError(format!("failed to read {}: {}", path.display(), e))
        })?;

        let bank = Self::parse(&content)?;
        info!(
            path = %path.display(),
            questions = bank.len(),
            topics = bank.distinct_topics().len() - 1,
            "question bank loaded"
        );
        Ok(bank)
    }

    /// All loaded questions in file order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of loaded questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether no question was loaded
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of questions filed under `topic`
    pub fn count_for(&self, topic: &str) -> usize {
        self.questions.iter().filter(|q| q.topic == topic).count()
    }

    /// Unique topics in first-seen order, followed by the random pseudo-topic
    pub fn distinct_topics(&self) -> Vec<TopicChoice> {
        let mut seen = HashSet::new();
        let mut topics: Vec<TopicChoice> = self
            .questions
            .iter()
            .filter(|q| seen.insert(q.topic.as_str()))
            .map(|q| TopicChoice::Topic(q.topic.clone()))
            .collect();
        topics.push(TopicChoice::Random);
        topics
    }
}
