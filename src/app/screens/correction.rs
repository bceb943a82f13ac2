//! Correction screen
//!
//! Browses the per-question review built after a session finished.

use crate::models::{OptionMark, QuestionKind, QuestionReview, ScoreResult};
use crate::util::format::format_score;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Correction screen state
#[derive(Debug, Default)]
pub struct CorrectionScreen {
    reviews: Vec<QuestionReview>,
    score: ScoreResult,
    selected_index: usize,
    list_state: ListState,
}

impl CorrectionScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the reviews and jump back to the first question
    pub fn set_reviews(&mut self, reviews: Vec<QuestionReview>) {
        self.score = ScoreResult {
            correct: reviews.iter().filter(|r| r.is_correct).count(),
            total: reviews.len(),
        };
        self.reviews = reviews;
        self.selected_index = 0;
        self.list_state
            .select(if self.reviews.is_empty() { None } else { Some(0) });
    }

    pub fn reviews(&self) -> &[QuestionReview] {
        &self.reviews
    }

    pub fn selected_review(&self) -> Option<&QuestionReview> {
        self.reviews.get(self.selected_index)
    }

    pub fn select_previous(&mut self) {
        if self.reviews.is_empty() {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            self.reviews.len() - 1
        } else {
            self.selected_index - 1
        };
        self.list_state.select(Some(self.selected_index));
    }

    pub fn select_next(&mut self) {
        if self.reviews.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.reviews.len();
        self.list_state.select(Some(self.selected_index));
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(3)])
            .split(f.size());

        let title = Paragraph::new(format!("Correction - {}", format_score(&self.score)))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);

        self.render_list(f, body[0]);
        self.render_detail(f, body[1]);

        let help = Paragraph::new("↑↓ Browse  Esc Back to score  R Restart  Q Quit")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(help, chunks[2]);
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .reviews
            .iter()
            .map(|review| {
                let (mark, color) = if review.is_correct {
                    ("✓", Color::Green)
                } else {
                    ("✗", Color::Red)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", mark), Style::default().fg(color)),
                    Span::raw(format!("{}. {}", review.number, review.prompt)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Questions"))
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let lines = self.selected_review().map(review_lines).unwrap_or_default();
        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Review"));
        f.render_widget(detail, area);
    }
}

/// Detail lines for one review
fn review_lines(review: &QuestionReview) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}. {}", review.number, review.prompt),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            review.kind.description(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for (i, option) in review.options.iter().enumerate() {
        let style = match option.mark {
            OptionMark::Correct => Style::default().fg(Color::Green),
            OptionMark::IncorrectlyChosen => Style::default().fg(Color::Red),
            OptionMark::Neutral => Style::default(),
        };
        let prefix = match review.kind {
            QuestionKind::Order => format!("{:>2}. ", i + 1),
            _ if option.chosen => "[x] ".to_string(),
            _ => "[ ] ".to_string(),
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option.text), style)));
    }

    lines.push(Line::from(""));
    let answer = if review.user_answer.is_empty() {
        "(no answer)".to_string()
    } else {
        review.user_answer.join(", ")
    };
    lines.push(Line::from(format!("Your answer: {}", answer)));
    lines.push(Line::from(Span::styled(
        format!("Correct answer: {}", review.correct_answer.join(", ")),
        Style::default().fg(Color::Green),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, Response};

    fn reviews() -> Vec<QuestionReview> {
        let question = Question {
            topic: "Git".to_string(),
            kind: QuestionKind::Single,
            prompt: "Undo last commit".to_string(),
            options: vec!["reset".to_string(), "push".to_string()],
            answer: vec!["reset".to_string()],
        };
        let right = Response::Selected(vec!["reset".to_string()]);
        vec![
            QuestionReview::new(1, &question, Some(&right)),
            QuestionReview::new(2, &question, None),
        ]
    }

    #[test]
    fn test_set_reviews_counts_score() {
        let mut screen = CorrectionScreen::new();
        screen.set_reviews(reviews());
        assert_eq!(screen.score, ScoreResult { correct: 1, total: 2 });
        assert_eq!(screen.selected_review().map(|r| r.number), Some(1));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut screen = CorrectionScreen::new();
        screen.set_reviews(reviews());
        screen.select_previous();
        assert_eq!(screen.selected_review().map(|r| r.number), Some(2));
        screen.select_next();
        assert_eq!(screen.selected_review().map(|r| r.number), Some(1));
    }

    #[test]
    fn test_unanswered_review_lines() {
        let lines = review_lines(&reviews()[1]);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.contains(&"Your answer: (no answer)".to_string()));
        assert!(text.contains(&"Correct answer: reset".to_string()));
    }
}
