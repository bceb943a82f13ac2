//! Main application controller
//!
//! Manages the TUI, application state, and screen rendering loop.

use crate::{
    app::{
        screens::{ScoreAction, Screens},
        state::{AppState, NavigationAction, StateManager},
        tui::Tui,
    },
    bank::QuestionBank,
    config::QuizConfig,
    error,
    session::{Command, Countdown, Outcome, QuizRunner},
    QuizError, Result,
};
use std::io;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error as log_error, warn};

/// TUI application controller
pub struct App {
    /// Terminal UI handler
    tui: Tui,
    /// Application state manager
    state_manager: StateManager,
    /// Application config
    config: QuizConfig,
    /// Present once the question file is loaded
    runner: Option<QuizRunner>,
    /// Screen components, also the runner's renderer
    screens: Screens,
    countdown: Countdown,
    tick_tx: mpsc::Sender<()>,
    tick_rx: mpsc::Receiver<()>,
    /// Background read of the question file
    load_task: Option<JoinHandle<Result<QuestionBank>>>,
    /// Shown on the blocking error screen
    load_error: Option<String>,
}

impl App {
    /// Create the application and start reading the question file.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: QuizConfig) -> Result<Self> {
        let (tick_tx, tick_rx) = mpsc::channel(16);
        let path = config.questions_path.clone();
        let load_task = tokio::spawn(async move { QuestionBank::load(path).await });

        Ok(Self {
            tui: Tui::new()
                .map_err(|e| QuizError::TuiError(format!("failed to open terminal: {}", e)))?,
            state_manager: StateManager::new(),
            screens: Screens::new(config.session_settings().time_limit_secs),
            config,
            runner: None,
            countdown: Countdown::idle(),
            tick_tx,
            tick_rx,
            load_task: Some(load_task),
            load_error: None,
        })
    }

    /// Initialize the TUI
    pub fn init(&mut self) -> Result<()> {
        self.tui
            .init()
            .map_err(|e| QuizError::TuiError(format!("failed to enter full-screen mode: {}", e)))
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        while !self.state_manager.should_quit() {
            self.poll_load().await;
            self.drain_ticks()?;
            self.draw()?;
            self.handle_events()?;
        }

        std::mem::take(&mut self.countdown).shutdown().await;
        self.tui.restore()?;
        Ok(())
    }

    /// Move out of `Loading` once the question file has been read
    async fn poll_load(&mut self) {
        if !self.load_task.as_ref().is_some_and(|t| t.is_finished()) {
            return;
        }
        let Some(task) = self.load_task.take() else {
            return;
        };

        let loaded = match task.await {
            Ok(result) => result,
            Err(e) => Err(QuizError::DataLoadError(format!("loader task failed: {}", e))),
        };

        match loaded {
            Ok(bank) => {
                let runner = QuizRunner::new(bank, self.config.session_settings());
                runner.show_topics(&mut self.screens);
                self.screens.topics.set_question_counts(runner.bank());
                self.runner = Some(runner);
                self.state_manager.transition_to(AppState::Topics);
            }
            Err(e) => {
                log_error!(error = %e, "question file unusable");
                self.load_error = Some(error::user_friendly_message(&e));
                self.state_manager.transition_to(AppState::LoadFailed);
            }
        }
    }

    /// Forward countdown ticks to the session
    fn drain_ticks(&mut self) -> Result<()> {
        while self.tick_rx.try_recv().is_ok() {
            self.dispatch(Command::Tick)?;
        }
        Ok(())
    }

    /// Send one command to the runner and follow its outcome.
    ///
    /// Recoverable errors end up as a status line on the topic screen.
    fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        let Some(runner) = self.runner.as_mut() else {
            return Ok(Outcome::Ignored);
        };

        let outcome = match runner.handle(command, &mut self.screens) {
            Ok(outcome) => outcome,
            Err(e) if error::is_recoverable(&e) => {
                warn!(error = %e, "command rejected");
                self.screens.topics.set_status(error::user_friendly_message(&e));
                return Ok(Outcome::Ignored);
            }
            Err(e) => return Err(e),
        };

        match outcome {
            Outcome::Started => {
                // Leftover ticks from a previous session must not count
                while self.tick_rx.try_recv().is_ok() {}
                self.screens.topics.clear_status();
                self.screens
                    .question
                    .start_session(self.config.session_settings().time_limit_secs);
                self.countdown = Countdown::start(self.config.tick_interval(), self.tick_tx.clone());
                self.state_manager.transition_to(AppState::Quiz);
            }
            Outcome::Finished(_) => {
                self.countdown.stop();
                self.state_manager.transition_to(AppState::Score);
            }
            Outcome::Reset => {
                self.countdown.stop();
                self.state_manager.transition_to(AppState::Topics);
            }
            Outcome::Updated | Outcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Draw the current screen
    fn draw(&mut self) -> io::Result<()> {
        let state = self.state_manager.current_state();
        let screens = &mut self.screens;
        let load_error = self.load_error.as_deref().unwrap_or_default();

        self.tui.draw(|f| match state {
            AppState::Loading => screens.topics.render_loading(f),
            AppState::LoadFailed => screens.topics.render_load_failed(f, load_error),
            AppState::Topics => screens.topics.render(f),
            AppState::Quiz => screens.question.render(f),
            AppState::Score => screens.score.render(f),
            AppState::Correction => screens.correction.render(f),
        })
    }

    /// Handle keyboard events and update state
    fn handle_events(&mut self) -> Result<()> {
        let Some(key) = self.tui.next_key()? else {
            return Ok(());
        };
        let action = StateManager::key_to_navigation(key);

        // Global key handling
        if action == NavigationAction::Quit {
            self.state_manager.quit();
            return Ok(());
        }

        match self.state_manager.current_state() {
            AppState::Loading | AppState::LoadFailed => {
                if action == NavigationAction::Back {
                    self.state_manager.quit();
                }
            }
            AppState::Topics => self.handle_topics_events(action)?,
            AppState::Quiz => self.handle_quiz_events(action)?,
            AppState::Score => self.handle_score_events(action)?,
            AppState::Correction => self.handle_correction_events(action)?,
        }
        Ok(())
    }

    fn handle_topics_events(&mut self, action: NavigationAction) -> Result<()> {
        match action {
            NavigationAction::Up | NavigationAction::Previous => self.screens.topics.select_previous(),
            NavigationAction::Down | NavigationAction::Next => self.screens.topics.select_next(),
            NavigationAction::Select => {
                if let Some(topic) = self.screens.topics.selected_topic().cloned() {
                    debug!(%topic, "topic chosen");
                    self.dispatch(Command::ChooseTopic(topic))?;
                    self.dispatch(Command::Start)?;
                }
            }
            NavigationAction::Back => self.state_manager.quit(),
            _ => {}
        }
        Ok(())
    }

    fn handle_quiz_events(&mut self, action: NavigationAction) -> Result<()> {
        match action {
            NavigationAction::Up => self.screens.question.cursor_up(),
            NavigationAction::Down => self.screens.question.cursor_down(),
            NavigationAction::Select => {
                let cursor = self.screens.question.cursor();
                self.dispatch(Command::Toggle(cursor))?;
            }
            NavigationAction::Left | NavigationAction::Previous => {
                self.dispatch(Command::Prev)?;
            }
            NavigationAction::Right | NavigationAction::Next => {
                self.dispatch(Command::Next)?;
            }
            NavigationAction::Submit => {
                let is_last = self.runner.as_ref().is_some_and(|r| r.session().is_last());
                if is_last {
                    self.dispatch(Command::Submit)?;
                }
            }
            NavigationAction::Restart => {
                self.dispatch(Command::Restart)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_score_events(&mut self, action: NavigationAction) -> Result<()> {
        match action {
            NavigationAction::Left | NavigationAction::Previous => {
                self.screens.score.select_previous_action()
            }
            NavigationAction::Right | NavigationAction::Next => self.screens.score.select_next_action(),
            NavigationAction::Select => match self.screens.score.selected_action() {
                ScoreAction::ShowCorrection => self.show_correction()?,
                ScoreAction::Restart => {
                    self.dispatch(Command::Restart)?;
                }
                ScoreAction::Quit => self.state_manager.quit(),
            },
            NavigationAction::Correction => self.show_correction()?,
            NavigationAction::Restart => {
                self.dispatch(Command::Restart)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_correction_events(&mut self, action: NavigationAction) -> Result<()> {
        match action {
            NavigationAction::Up => self.screens.correction.select_previous(),
            NavigationAction::Down => self.screens.correction.select_next(),
            NavigationAction::Back => self.state_manager.go_back(),
            NavigationAction::Restart => {
                self.dispatch(Command::Restart)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn show_correction(&mut self) -> Result<()> {
        if self.dispatch(Command::ShowCorrection)? == Outcome::Updated {
            self.state_manager.transition_to(AppState::Correction);
        }
        Ok(())
    }
}
