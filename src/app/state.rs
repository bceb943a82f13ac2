//! Application state management
//!
//! Handles screen transitions and keyboard event mapping for the TUI
//! application.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens/states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Question file is being read
    #[default]
    Loading,
    /// Question file could not be loaded; nothing else is possible
    LoadFailed,
    /// Topic selection
    Topics,
    /// Answering questions with the countdown running
    Quiz,
    /// Final score with follow-up actions
    Score,
    /// Per-question answer review
    Correction,
}

/// What a key press means, independent of the screen it lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Previous option, topic or review entry (↑, k)
    Up,
    /// Next option, topic or review entry (↓, j)
    Down,
    /// Previous question or score action (←, h)
    Left,
    /// Next question or score action (→, l)
    Right,
    /// Choose, toggle or tap the item under the cursor (Enter, Space)
    Select,
    /// Leave the review, or quit from the topic list (Esc, Backspace)
    Back,
    /// Tab
    Next,
    /// Shift+Tab
    Previous,
    /// Finish the quiz (s)
    Submit,
    /// Back to topic selection (r)
    Restart,
    /// Show the answer review (c)
    Correction,
    /// Leave the program (q, Ctrl+C)
    Quit,
    /// Unbound key
    None,
}

/// Application state manager
#[derive(Debug, Default)]
pub struct StateManager {
    current_state: AppState,
    previous_state: Option<AppState>,
    should_quit: bool,
}

impl StateManager {
    /// Create a new state manager waiting for the question file
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current application state
    pub fn current_state(&self) -> AppState {
        self.current_state
    }

    /// Get the previous state if available
    pub fn previous_state(&self) -> Option<AppState> {
        self.previous_state
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Set the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Transition to a new state
    pub fn transition_to(&mut self, new_state: AppState) {
        if new_state != self.current_state {
            self.previous_state = Some(self.current_state);
            self.current_state = new_state;
        }
    }

    /// Go back from the review to the score. Other screens have nothing
    /// behind them.
    pub fn go_back(&mut self) {
        if self.current_state == AppState::Correction {
            self.transition_to(AppState::Score);
        }
    }

    /// Map a key press to the action it stands for
    pub fn key_to_navigation(key: KeyEvent) -> NavigationAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('c') if ctrl => NavigationAction::Quit,
            KeyCode::Tab if shift => NavigationAction::Previous,
            KeyCode::BackTab => NavigationAction::Previous,
            KeyCode::Tab => NavigationAction::Next,

            KeyCode::Up => NavigationAction::Up,
            KeyCode::Down => NavigationAction::Down,
            KeyCode::Left => NavigationAction::Left,
            KeyCode::Right => NavigationAction::Right,
            KeyCode::Enter => NavigationAction::Select,
            KeyCode::Esc | KeyCode::Backspace => NavigationAction::Back,

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'k' => NavigationAction::Up,
                'j' => NavigationAction::Down,
                'h' => NavigationAction::Left,
                'l' => NavigationAction::Right,
                ' ' => NavigationAction::Select,
                's' => NavigationAction::Submit,
                'r' => NavigationAction::Restart,
                'c' => NavigationAction::Correction,
                'q' => NavigationAction::Quit,
                _ => NavigationAction::None,
            },

            _ => NavigationAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_state_manager_creation() {
        let state_manager = StateManager::new();
        assert_eq!(state_manager.current_state(), AppState::Loading);
        assert!(!state_manager.should_quit());
        assert!(state_manager.previous_state().is_none());
    }

    #[test]
    fn test_state_transitions() {
        let mut state_manager = StateManager::new();

        state_manager.transition_to(AppState::Topics);
        state_manager.transition_to(AppState::Quiz);
        assert_eq!(state_manager.current_state(), AppState::Quiz);
        assert_eq!(state_manager.previous_state(), Some(AppState::Topics));

        // Same state does not overwrite history
        state_manager.transition_to(AppState::Quiz);
        assert_eq!(state_manager.previous_state(), Some(AppState::Topics));
    }

    #[test]
    fn test_go_back_only_from_correction() {
        let mut state_manager = StateManager::new();
        state_manager.transition_to(AppState::Quiz);
        state_manager.go_back();
        assert_eq!(state_manager.current_state(), AppState::Quiz);

        state_manager.transition_to(AppState::Score);
        state_manager.transition_to(AppState::Correction);
        state_manager.go_back();
        assert_eq!(state_manager.current_state(), AppState::Score);
    }

    #[test]
    fn test_quit_flag() {
        let mut state_manager = StateManager::new();
        state_manager.quit();
        assert!(state_manager.should_quit());
    }

    #[test]
    fn test_key_to_navigation() {
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char('q'))),
            NavigationAction::Quit
        );
        assert_eq!(
            StateManager::key_to_navigation(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            NavigationAction::Quit
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char('c'))),
            NavigationAction::Correction
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char('k'))),
            NavigationAction::Up
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Right)),
            NavigationAction::Right
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char(' '))),
            NavigationAction::Select
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char('s'))),
            NavigationAction::Submit
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char('r'))),
            NavigationAction::Restart
        );
        assert_eq!(
            StateManager::key_to_navigation(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)),
            NavigationAction::Previous
        );
        assert_eq!(
            StateManager::key_to_navigation(key(KeyCode::Char('x'))),
            NavigationAction::None
        );
    }
}
