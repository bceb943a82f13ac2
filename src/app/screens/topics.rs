//! Topic selection screen
//!
//! Lists the topics of the loaded question file plus the random mode.
//! Also shows the loading and load-failure states that precede it.

use crate::bank::QuestionBank;
use crate::models::TopicChoice;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::collections::HashMap;

/// Topic selection screen component
#[derive(Debug, Default)]
pub struct TopicsScreen {
    topics: Vec<TopicChoice>,
    /// Topic the next session starts with
    chosen: Option<TopicChoice>,
    selected_index: usize,
    /// Questions per topic name, shown next to each entry
    counts: HashMap<String, usize>,
    list_state: ListState,
    /// Recoverable start error shown under the list
    status: Option<String>,
}

impl TopicsScreen {
    /// Create an empty topic screen
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            ..Self::default()
        }
    }

    /// Replace the topic list, keeping the cursor on the chosen topic
    pub fn set_topics(&mut self, topics: &[TopicChoice], chosen: Option<&TopicChoice>) {
        self.topics = topics.to_vec();
        self.chosen = chosen.cloned();
        if let Some(pos) = chosen.and_then(|c| self.topics.iter().position(|t| t == c)) {
            self.selected_index = pos;
        } else if self.selected_index >= self.topics.len() {
            self.selected_index = 0;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Count the questions behind every listed topic
    pub fn set_question_counts(&mut self, bank: &QuestionBank) {
        self.counts = self
            .topics
            .iter()
            .filter_map(|topic| match topic {
                TopicChoice::Topic(name) => Some((name.clone(), bank.count_for(name))),
                TopicChoice::Random => None,
            })
            .collect();
    }

    /// Questions counted for a topic, `None` for random mode or before counting
    pub fn question_count(&self, topic: &TopicChoice) -> Option<usize> {
        match topic {
            TopicChoice::Topic(name) => self.counts.get(name).copied(),
            TopicChoice::Random => None,
        }
    }

    /// Topic under the cursor
    pub fn selected_topic(&self) -> Option<&TopicChoice> {
        self.topics.get(self.selected_index)
    }

    /// Show a message under the list
    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    /// Remove the status message
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Get the status message
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        if self.topics.is_empty() {
            return;
        }
        if self.selected_index > 0 {
            self.selected_index -= 1;
        } else {
            self.selected_index = self.topics.len() - 1;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if self.topics.is_empty() {
            return;
        }
        if self.selected_index < self.topics.len() - 1 {
            self.selected_index += 1;
        } else {
            self.selected_index = 0;
        }
        self.list_state.select(Some(self.selected_index));
    }

    /// Render the topic screen
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Title and subtitle
                Constraint::Min(6),    // Topic list
                Constraint::Length(3), // Status
                Constraint::Length(3), // Help text
            ])
            .split(f.size());

        render_title(f, chunks[0], "Choose a topic");
        self.render_list(f, chunks[1]);
        self.render_status(f, chunks[2]);
        self.render_help(f, chunks[3]);
    }

    /// Render the waiting screen shown while the question file loads
    pub fn render_loading(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(f.size());

        render_title(f, chunks[0], "Loading questions...");
        let body = Paragraph::new("Reading the question file")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(body, chunks[1]);
    }

    /// Render the blocking error shown when the question file is unusable
    pub fn render_load_failed(&self, f: &mut Frame, message: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(6), Constraint::Length(3)])
            .split(f.size());

        render_title(f, chunks[0], "Questions unavailable");

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "The question file could not be loaded:",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        ];
        let body = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        f.render_widget(body, chunks[1]);

        let help = Paragraph::new("Press Q or Esc to quit")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(help, chunks[2]);
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .topics
            .iter()
            .map(|topic| {
                let style = match topic {
                    TopicChoice::Random => Style::default().fg(Color::Magenta),
                    TopicChoice::Topic(_) => Style::default(),
                };
                let marker = if self.chosen.as_ref() == Some(topic) { "● " } else { "  " };
                let mut spans = vec![
                    Span::raw(marker),
                    Span::styled(topic.label().to_string(), style),
                ];
                if let Some(count) = self.question_count(topic) {
                    let noun = if count == 1 { "question" } else { "questions" };
                    spans.push(Span::styled(
                        format!("  {} {}", count, noun),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Topics"))
            .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let text = match &self.status {
            Some(message) => Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
            None => Span::raw(""),
        };
        let status = Paragraph::new(Line::from(text))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let help_text = Line::from(vec![
            Span::styled("↑↓", key),
            Span::raw(" Navigate  "),
            Span::styled("Enter", key),
            Span::raw(" Start  "),
            Span::styled("Q", key),
            Span::raw(" Quit"),
        ]);

        let help = Paragraph::new(help_text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

        f.render_widget(help, area);
    }
}

/// Shared banner used by the topic, loading and failure screens
fn render_title(f: &mut Frame, area: Rect, subtitle: &str) {
    let title_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new("QUIZTERM")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(title, title_chunks[0]);

    let subtitle = Paragraph::new(subtitle.to_string())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    f.render_widget(subtitle, title_chunks[1]);
}
