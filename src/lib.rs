//! # daily-quiz
//!
//! A timed trivia quiz for the terminal. Questions come from Open Trivia DB
//! (or a local JSON file), each attempt runs against a countdown, and
//! completed attempts are kept in a local history.
//!
//! The session core lives in [`quiz`]; everything else feeds it commands and
//! renders its state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use daily_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = QuizConfig::load(None)?;
//!     Quiz::from_config(config)?.run().await
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod models;
pub mod quiz;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tracing::info;

pub use app::{App, Dialog};
pub use config::{ConfigError, QuizConfig};
pub use data::{
    HistoryError, HistoryStore, JsonFileSource, JsonHistoryStore, MemoryHistoryStore, OpenTdbSource,
    QuestionRequest, QuestionSource, SourceError,
};
pub use models::{AppState, HistoryEntry, Question, QuestionResult};
pub use quiz::{EventReceiver, Phase, QuizSession, Scheduler, SessionError, SessionEvent, Transition};

use terminal::TerminalGuard;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load questions: {0}")]
    Source(#[from] SourceError),

    #[error("history error: {0}")]
    History(#[from] HistoryError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz application that can be run in the terminal.
pub struct Quiz {
    app: App,
    events: EventReceiver,
}

impl Quiz {
    /// Create a quiz with explicit collaborators.
    pub fn new(
        config: QuizConfig,
        source: Box<dyn QuestionSource>,
        history: Box<dyn HistoryStore>,
    ) -> Self {
        let (scheduler, events) = Scheduler::channel();
        Self {
            app: App::new(config, source, history, scheduler),
            events,
        }
    }

    /// Validate `config` and wire up the source and history store it describes.
    pub fn from_config(config: QuizConfig) -> Result<Self, QuizError> {
        config.validate()?;
        let source: Box<dyn QuestionSource> = match &config.questions.file {
            Some(path) => Box::new(JsonFileSource::new(path)),
            None => Box::new(OpenTdbSource::new(config.questions.endpoint.clone())),
        };
        let history = JsonHistoryStore::open(config.history_path())?;
        info!(path = %history.path().display(), entries = history.len(), "history loaded");
        Ok(Self::new(config, source, Box::new(history)))
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = TerminalGuard::enter()?;
        run_event_loop(&mut term, &mut self.app, &mut self.events).await
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    events: &mut EventReceiver,
) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.state == AppState::Loading {
            app.load_session().await;
            continue;
        }

        while let Ok(event) = events.try_recv() {
            app.handle_session_event(event);
        }

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(app, key.code) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if let Some(dialog) = app.dialog() {
        return handle_dialog_input(app, dialog, key);
    }

    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Loading => false,
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result { .. } => handle_result_input(app, key),
        AppState::History => handle_history_input(app, key),
        AppState::HistoryDetail => handle_detail_input(app, key),
    }
}

fn handle_dialog_input(app: &mut App, dialog: Dialog, key: KeyCode) -> bool {
    match (dialog, key) {
        (Dialog::TimeUp, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter) => {
            app.restart_after_timeout();
            false
        }
        (Dialog::TimeUp, KeyCode::Char('q') | KeyCode::Char('Q')) => true,
        (Dialog::ConfirmExit, KeyCode::Char('y') | KeyCode::Char('Y')) => {
            app.confirm_exit();
            false
        }
        (Dialog::ConfirmExit, KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc) => {
            app.dismiss_dialog();
            false
        }
        _ => false,
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => {
            app.start_quiz();
            false
        }
        KeyCode::Char('h') | KeyCode::Char('H') => {
            app.open_history();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Char(c @ '1'..='9') => app.choose_option(c as usize - '1' as usize),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => app.request_exit(),
        _ => {}
    }
    false
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.start_quiz();
            false
        }
        KeyCode::Char('h') | KeyCode::Char('H') => {
            app.open_history();
            false
        }
        KeyCode::Esc => {
            app.back();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_history_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.select_next_history(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_history(),
        KeyCode::Enter => app.open_history_detail(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_history(),
        KeyCode::Char('s') => app.start_quiz(),
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_detail_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_detail_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_detail_up(),
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
