//! Question screen implementation
//!
//! Shows the current question with its options, the countdown and the
//! position in the session.

use crate::models::{Question, QuestionKind, Response};
use crate::util::format::{format_clock, Urgency};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Question screen component
#[derive(Debug, Default)]
pub struct QuestionScreen {
    question: Option<Question>,
    response: Option<Response>,
    /// Armed position of an ordering question
    armed: Option<usize>,
    cursor: usize,
    list_state: ListState,
    remaining_secs: u32,
    time_limit_secs: u32,
    current: usize,
    total: usize,
}

impl QuestionScreen {
    /// Create a question screen for a given time limit
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            time_limit_secs,
            remaining_secs: time_limit_secs,
            ..Self::default()
        }
    }

    /// Show a question or redraw the current one after an answer.
    ///
    /// The cursor is kept; moving to another position resets it in
    /// [`set_progress`](Self::set_progress).
    pub fn set_question(&mut self, question: &Question, response: Option<&Response>, armed: Option<usize>) {
        self.question = Some(question.clone());
        self.response = response.cloned();
        self.armed = armed;
        if self.cursor >= question.options.len() {
            self.cursor = 0;
        }
        self.list_state.select(Some(self.cursor));
    }

    /// Update the remaining time
    pub fn set_remaining(&mut self, remaining_secs: u32) {
        self.remaining_secs = remaining_secs;
    }

    /// Prepare for a new session: urgency colors follow `time_limit_secs`
    /// and the cursor goes back to the first option
    pub fn start_session(&mut self, time_limit_secs: u32) {
        self.time_limit_secs = time_limit_secs;
        self.reset_cursor();
    }

    /// Update the position (0-based `current`). The cursor resets when the
    /// position changes.
    pub fn set_progress(&mut self, current: usize, total: usize) {
        if current != self.current || total != self.total {
            self.reset_cursor();
        }
        self.current = current;
        self.total = total;
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.list_state.select(Some(0));
    }

    /// Get the remaining time
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Get the cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the current question is the last one
    pub fn is_last(&self) -> bool {
        self.total > 0 && self.current + 1 == self.total
    }

    /// Get the displayed question
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Move the cursor up
    pub fn cursor_up(&mut self) {
        let len = self.option_count();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
        self.list_state.select(Some(self.cursor));
    }

    /// Move the cursor down
    pub fn cursor_down(&mut self) {
        let len = self.option_count();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
        self.list_state.select(Some(self.cursor));
    }

    fn option_count(&self) -> usize {
        self.question.as_ref().map_or(0, |q| q.options.len())
    }

    /// Lines shown in the option list, in display order
    fn option_lines(&self) -> Vec<Line<'static>> {
        let Some(question) = &self.question else {
            return Vec::new();
        };

        match question.kind {
            QuestionKind::Order => question
                .arrangement(self.response.as_ref())
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let style = if self.armed == Some(i) {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::Gray)),
                        Span::styled(item.clone(), style),
                    ])
                })
                .collect(),
            kind => question
                .options
                .iter()
                .map(|option| {
                    let chosen = self.response.as_ref().is_some_and(|r| r.contains(option));
                    let marker = match (kind, chosen) {
                        (QuestionKind::Single, true) => "(•) ",
                        (QuestionKind::Single, false) => "( ) ",
                        (_, true) => "[x] ",
                        (_, false) => "[ ] ",
                    };
                    let style = if chosen {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![Span::styled(marker, style), Span::styled(option.clone(), style)])
                })
                .collect(),
        }
    }

    /// Render the question screen
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Topic, kind and timer
                Constraint::Length(3), // Progress
                Constraint::Length(5), // Prompt
                Constraint::Min(5),    // Options
                Constraint::Length(3), // Help text
            ])
            .split(f.size());

        self.render_header(f, chunks[0]);
        self.render_progress(f, chunks[1]);
        self.render_prompt(f, chunks[2]);
        self.render_options(f, chunks[3]);
        self.render_help(f, chunks[4]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(14)])
            .split(area);

        let (topic, kind) = self
            .question
            .as_ref()
            .map(|q| (q.topic.clone(), q.kind.description()))
            .unwrap_or_default();

        let title = Paragraph::new(Line::from(vec![
            Span::styled(topic, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(kind, Style::default().fg(Color::Gray)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, header_chunks[0]);

        let color = match Urgency::classify(self.remaining_secs, self.time_limit_secs) {
            Urgency::Relaxed => Color::Green,
            Urgency::Hurry => Color::Yellow,
            Urgency::Critical => Color::Red,
        };
        let timer = Paragraph::new(format_clock(self.remaining_secs))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title("Time")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(timer, header_chunks[1]);
    }

    fn render_progress(&self, f: &mut Frame, area: Rect) {
        let ratio = if self.total == 0 {
            0.0
        } else {
            (self.current + 1) as f64 / self.total as f64
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("Question {} / {}", self.current + 1, self.total));

        f.render_widget(gauge, area);
    }

    fn render_prompt(&self, f: &mut Frame, area: Rect) {
        let prompt = self.question.as_ref().map(|q| q.prompt.clone()).unwrap_or_default();
        let widget = Paragraph::new(prompt)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
    }

    fn render_options(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self.option_lines().into_iter().map(ListItem::new).collect();

        let title = match self.question.as_ref().map(|q| q.kind) {
            Some(QuestionKind::Order) if self.armed.is_some() => "Options (pick the item to swap with)",
            Some(QuestionKind::Order) => "Options (pick two items to swap)",
            _ => "Options",
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled("↑↓", key),
            Span::raw(" Move  "),
            Span::styled("Space", key),
            Span::raw(" Choose  "),
            Span::styled("←→", key),
            Span::raw(" Question  "),
        ];
        if self.is_last() {
            spans.push(Span::styled("S", key));
            spans.push(Span::raw(" Submit  "));
        }
        spans.push(Span::styled("R", key));
        spans.push(Span::raw(" Restart  "));
        spans.push(Span::styled("Q", key));
        spans.push(Span::raw(" Quit"));

        let help = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(help, area);
    }
}
