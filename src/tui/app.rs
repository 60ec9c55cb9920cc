//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{ArtifactBundle, InMemorySessionStore};
use crate::application::{AnalyticsService, ArtifactPredictionService};
use crate::config::AppConfig;
use crate::ports::SessionStore;
use crate::ObescanError;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    form::{render_form, FormState},
    history::{render_history, HistoryState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Form,
    Result,
    History,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    config: AppConfig,

    prediction_service: ArtifactPredictionService,

    analytics_service: AnalyticsService,

    /// Process-lifetime session state
    store: Arc<InMemorySessionStore>,

    /// The single session this terminal owns
    session_id: String,

    dashboard_state: DashboardState,
    form_state: FormState,
    result_state: ResultState,
    history_state: HistoryState,

    /// First row of the visible history page
    history_offset: usize,
}

impl App {
    /// Create a new application, loading artifacts from the configured
    /// directory.
    ///
    /// # Errors
    /// Returns error if the artifacts cannot be loaded or verified.
    pub fn new(config: AppConfig) -> Result<Self> {
        let bundle = ArtifactBundle::load(&config.artifact_dir, config.require_manifest)
            .with_context(|| format!("Failed to load artifacts from {:?}", config.artifact_dir))?;

        Self::with_dependencies(config, &bundle, Arc::new(InMemorySessionStore::new()))
    }

    /// Create application with injected dependencies.
    ///
    /// # Errors
    /// Returns error if the artifacts disagree or no session can be created.
    pub fn with_dependencies(
        config: AppConfig,
        bundle: &ArtifactBundle,
        store: Arc<InMemorySessionStore>,
    ) -> Result<Self> {
        let prediction_service = ArtifactPredictionService::from_bundle(bundle)?;
        let session = store.create_session()?;
        let schema = prediction_service.normalizer().schema();

        let dashboard_state = DashboardState {
            artifact_dir: config.artifact_dir.display().to_string(),
            model_kind: bundle.classifier.kind().to_string(),
            scaler_kind: bundle.scaler.kind().to_string(),
            columns: schema.column_names(),
            manifest_verified: bundle.verified,
            ..DashboardState::default()
        };
        let form_state = FormState::for_schema(schema);

        tracing::info!("Session started with {} input columns", schema.len());

        Ok(Self {
            screen: Screen::Dashboard,
            should_quit: false,
            config,
            prediction_service,
            analytics_service: AnalyticsService::new(),
            store,
            session_id: session.id,
            dashboard_state,
            form_state,
            result_state: ResultState::default(),
            history_state: HistoryState::default(),
            history_offset: 0,
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.update_dashboard_state();

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        self.end_session();

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::Form => render_form(f, chunks[0], &self.form_state),
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                    Screen::History => render_history(f, chunks[0], &self.history_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
            Screen::History => self.handle_history_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n' | 'N') => self.open_form(),
            KeyCode::Char('h' | 'H') => self.open_history(),
            KeyCode::Char('r' | 'R') => self.reset_session(),
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_row(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_row(),
            KeyCode::Left => self.form_state.cycle_choice(false),
            KeyCode::Right | KeyCode::Char(' ') => self.form_state.cycle_choice(true),
            KeyCode::Char('s' | 'S') => self.form_state.load_sample_data(),
            KeyCode::Char('u' | 'U') => self.form_state.toggle_height_unit(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_row(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match &self.result_state {
            ResultState::Error { .. } => match key {
                KeyCode::Enter => self.screen = Screen::Form,
                KeyCode::Esc => self.screen = Screen::Dashboard,
                _ => {}
            },
            _ => match key {
                KeyCode::Char('n' | 'N') => self.open_form(),
                KeyCode::Char('h' | 'H') => self.open_history(),
                KeyCode::Enter | KeyCode::Esc => self.screen = Screen::Dashboard,
                _ => {}
            },
        }
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Char('r' | 'R') => {
                self.reset_session();
                self.load_history();
            }
            KeyCode::PageDown | KeyCode::Right => {
                let next = self.history_state.page.as_ref().and_then(|p| p.next_offset());
                if let Some(offset) = next {
                    self.history_offset = offset;
                    self.load_history();
                }
            }
            KeyCode::PageUp | KeyCode::Left => {
                let prev = self.history_state.page.as_ref().and_then(|p| p.prev_offset());
                if let Some(offset) = prev {
                    self.history_offset = offset;
                    self.load_history();
                }
            }
            _ => {}
        }
    }

    fn open_history(&mut self) {
        self.history_offset = 0;
        self.load_history();
        self.screen = Screen::History;
    }

    fn open_form(&mut self) {
        self.form_state.clear_sensitive();
        self.screen = Screen::Form;
    }

    fn submit_form(&mut self) {
        let form = match self.form_state.to_form() {
            Ok(form) => form,
            Err(e) => {
                self.form_state.error_message = Some(e.to_string());
                return;
            }
        };

        match self
            .prediction_service
            .submit_for(self.store.as_ref(), &self.session_id, &form)
        {
            Ok(prediction) => {
                self.result_state = ResultState::Complete {
                    prediction: Box::new(prediction),
                };
                // Clear typed values from the UI once the result is in.
                self.form_state.clear_sensitive();
                self.update_dashboard_state();
                self.screen = Screen::Result;
            }
            Err(ObescanError::InvalidInput(message)) => {
                self.form_state.error_message = Some(message);
            }
            Err(e) => {
                if e.is_fatal() {
                    tracing::error!("Prediction failed: {}", e);
                } else {
                    tracing::warn!("Prediction rejected: {}", e);
                }
                self.result_state = ResultState::Error {
                    message: e.to_string(),
                };
                self.screen = Screen::Result;
            }
        }
    }

    fn reset_session(&mut self) {
        if let Err(e) = self.store.reset_session(&self.session_id) {
            tracing::error!("Failed to reset session: {}", e);
        }
        self.result_state = ResultState::Idle;
        self.history_offset = 0;
        self.update_dashboard_state();
    }

    fn end_session(&mut self) {
        if let Err(e) = self.store.end_session(&self.session_id) {
            tracing::warn!("Failed to end session: {}", e);
        }
    }

    fn update_dashboard_state(&mut self) {
        match self.store.load_session(&self.session_id) {
            Ok(Some(session)) => {
                let stats = self.analytics_service.summarize(&session);
                self.dashboard_state.prediction_count = stats.total;
                self.dashboard_state.most_frequent = stats.most_frequent;
                self.dashboard_state.latest = session.latest().cloned().map(Box::new);
            }
            Ok(None) => tracing::warn!("Session no longer exists"),
            Err(e) => tracing::error!("Failed to load session: {}", e),
        }
    }

    fn load_history(&mut self) {
        self.history_state = HistoryState::default();

        let session = match self.store.load_session(&self.session_id) {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.history_state.error = Some("Session no longer exists".to_string());
                return;
            }
            Err(e) => {
                self.history_state.error = Some(e.to_string());
                return;
            }
        };

        self.history_state.statistics = Some(self.analytics_service.summarize(&session));

        match self
            .store
            .load_history_page(&self.session_id, self.history_offset, self.config.history_limit)
        {
            Ok(page) => self.history_state.page = Some(page),
            Err(e) => self.history_state.error = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObesityCategory;
    use std::path::Path;

    fn app() -> (App, Arc<InMemorySessionStore>) {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let bundle = ArtifactBundle::load(&dir, true).unwrap();
        let store = Arc::new(InMemorySessionStore::new());
        let config = AppConfig {
            history_limit: 2,
            ..AppConfig::default()
        };
        let app = App::with_dependencies(config, &bundle, Arc::clone(&store)).unwrap();
        (app, store)
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_sample_submission_reaches_result() {
        let (mut app, store) = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::Form);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Result);
        match &app.result_state {
            ResultState::Complete { prediction } => {
                assert_eq!(prediction.category(), ObesityCategory::NormalWeight);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        assert!(app.form_state.rows.iter().all(|r| r.value.is_empty()));
        assert_eq!(store.load_session(&app.session_id).unwrap().unwrap().len(), 1);
        assert_eq!(app.dashboard_state.prediction_count, 1);
    }

    #[test]
    fn test_invalid_form_stays_on_form() {
        let (mut app, store) = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Form);
        assert!(app.form_state.error_message.is_some());
        assert!(store.load_session(&app.session_id).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_history_is_limited_and_resettable() {
        let (mut app, store) = app();
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('n'));
            press(&mut app, KeyCode::Char('s'));
            press(&mut app, KeyCode::Enter);
        }

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::History);
        let page = app.history_state.page.as_ref().unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 3);
        assert_eq!(app.history_state.statistics.as_ref().unwrap().total, 3);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.history_state.statistics.as_ref().unwrap().total, 0);
        assert!(store.load_session(&app.session_id).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_history_pages_forward_and_back() {
        let (mut app, _) = app();
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('n'));
            press(&mut app, KeyCode::Char('s'));
            press(&mut app, KeyCode::Enter);
        }

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.history_state.page.as_ref().unwrap().offset, 0);

        press(&mut app, KeyCode::PageDown);
        let page = app.history_state.page.as_ref().unwrap();
        assert_eq!(page.offset, 2);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_more);

        // Already on the last page.
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.history_state.page.as_ref().unwrap().offset, 2);

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.history_state.page.as_ref().unwrap().offset, 0);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.history_state.page.as_ref().unwrap().offset, 0);
    }

    #[test]
    fn test_ctrl_q_quits_from_form() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_end_session_removes_state() {
        let (mut app, store) = app();
        assert_eq!(store.count_sessions().unwrap(), 1);
        app.end_session();
        assert_eq!(store.count_sessions().unwrap(), 0);
    }
}
