//! Score screen implementation
//!
//! Displays the final score of a session with the follow-up actions.

use crate::models::ScoreResult;
use crate::util::format::format_score;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Available actions on the score screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreAction {
    ShowCorrection,
    Restart,
    Quit,
}

impl ScoreAction {
    /// Get all available actions
    pub fn all() -> [Self; 3] {
        [Self::ShowCorrection, Self::Restart, Self::Quit]
    }

    /// Get display text for the action
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::ShowCorrection => "Show Correction",
            Self::Restart => "Restart",
            Self::Quit => "Quit",
        }
    }
}

/// Score screen component
#[derive(Debug)]
pub struct ScoreScreen {
    result: Option<ScoreResult>,
    selected_action: ScoreAction,
}

impl Default for ScoreScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreScreen {
    /// Create a new score screen
    pub fn new() -> Self {
        Self {
            result: None,
            selected_action: ScoreAction::ShowCorrection,
        }
    }

    /// Set the score to display and reset the action cursor
    pub fn set_result(&mut self, result: ScoreResult) {
        self.result = Some(result);
        self.selected_action = ScoreAction::ShowCorrection;
    }

    /// Get the displayed score
    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    /// Get selected action
    pub fn selected_action(&self) -> ScoreAction {
        self.selected_action
    }

    /// Select next action
    pub fn select_next_action(&mut self) {
        let actions = ScoreAction::all();
        let current = actions.iter().position(|a| *a == self.selected_action).unwrap_or(0);
        self.selected_action = actions[(current + 1) % actions.len()];
    }

    /// Select previous action
    pub fn select_previous_action(&mut self) {
        let actions = ScoreAction::all();
        let current = actions.iter().position(|a| *a == self.selected_action).unwrap_or(0);
        let prev = if current == 0 { actions.len() - 1 } else { current - 1 };
        self.selected_action = actions[prev];
    }

    /// Render the score screen
    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Score
                Constraint::Length(3), // Gauge
                Constraint::Length(3), // Actions
                Constraint::Length(3), // Help text
            ])
            .split(f.size());

        let title = Paragraph::new("Quiz Complete")
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            );
        f.render_widget(title, chunks[0]);

        let result = self.result.unwrap_or_default();
        let score = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format_score(&result),
                Style::default().fg(score_color(&result)).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Score"));
        f.render_widget(score, chunks[1]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(score_color(&result)))
            .percent(result.percentage().round().clamp(0.0, 100.0) as u16);
        f.render_widget(gauge, chunks[2]);

        self.render_actions(f, chunks[3]);

        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let help = Paragraph::new(Line::from(vec![
            Span::styled("←→", key),
            Span::raw(" Choose  "),
            Span::styled("Enter", key),
            Span::raw(" Confirm  "),
            Span::styled("C", key),
            Span::raw(" Correction  "),
            Span::styled("R", key),
            Span::raw(" Restart"),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(help, chunks[4]);
    }

    fn render_actions(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for action in ScoreAction::all() {
            let style = if action == self.selected_action {
                Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", action.display_text()), style));
            spans.push(Span::raw("   "));
        }

        let actions = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(actions, area);
    }
}

fn score_color(result: &ScoreResult) -> Color {
    match result.percentage() {
        p if p >= 80.0 => Color::Green,
        p if p >= 50.0 => Color::Yellow,
        _ => Color::Red,
    }
}
