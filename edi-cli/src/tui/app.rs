use anyhow::Result;
use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal, Frame,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, trace};

use edi_core::intake::{IntakeWizard, NavOutcome};
use edi_core::locale::language_name;

use super::events::AppEvent;
use super::modal;
use super::screens;
use super::theme::Theme;
use super::IntakeExit;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Main application state
pub struct App {
    wizard: IntakeWizard,
    /// Highlighted choice on the current step
    cursor: usize,
    /// Rejection notice shown over the step until a key is pressed
    notice: Option<String>,
    exit: Option<IntakeExit>,
    theme: Theme,
}

impl App {
    pub fn new(wizard: IntakeWizard) -> Self {
        let mut app = Self {
            wizard,
            cursor: 0,
            notice: None,
            exit: None,
            theme: Theme::default(),
        };
        app.sync_cursor();
        app
    }

    /// Run the application
    pub async fn run(mut self) -> Result<IntakeExit> {
        let mut terminal = ratatui::init();
        if let Err(e) = terminal.clear() {
            ratatui::restore();
            return Err(e.into());
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        // Blocking reader; stops once the receiver is gone
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            let app_event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                Ok(_) => continue,
                Err(_) => break,
            };
            if event_tx.send(app_event).is_err() {
                break;
            }
        });

        let result = self.main_loop(&mut terminal, event_rx).await;
        ratatui::restore();
        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        mut event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<IntakeExit> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            let event = match time::timeout(Duration::from_millis(50), event_rx.recv()).await {
                Ok(Some(event)) => event,
                // Input reader died; nothing more can be answered
                Ok(None) => return Ok(IntakeExit::Abandoned),
                Err(_) => AppEvent::Tick,
            };
            self.handle_event(event);

            if let Some(exit) = self.exit.take() {
                return Ok(exit);
            }
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(width, height) => trace!("Resized to {}x{}", width, height),
            AppEvent::Tick => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        // Any key dismisses the notice
        if self.notice.take().is_some() {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.choice_count().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            KeyCode::Char(' ') => {
                self.wizard.select_index(self.cursor);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if self.wizard.select_index(index) {
                    self.cursor = index;
                }
            }
            KeyCode::Enter | KeyCode::Right => {
                let outcome = self.wizard.go_next();
                self.apply(outcome);
            }
            KeyCode::Left | KeyCode::Backspace | KeyCode::Char('b') => {
                let outcome = self.wizard.go_back();
                self.apply(outcome);
            }
            _ => {}
        }
    }

    fn apply(&mut self, outcome: NavOutcome) {
        match outcome {
            NavOutcome::Moved(step) => {
                debug!("Moved to step {}", step);
                self.sync_cursor();
            }
            NavOutcome::Unchanged => {}
            NavOutcome::Rejected { notice } => self.notice = Some(notice),
            NavOutcome::Submit(pending) => self.exit = Some(IntakeExit::Submitted(pending)),
        }
    }

    fn quit(&mut self) {
        self.wizard.abandon();
        self.exit = Some(IntakeExit::Abandoned);
    }

    /// Put the cursor on the step's recorded answer, or the first choice
    fn sync_cursor(&mut self) {
        self.cursor = self
            .wizard
            .view()
            .and_then(|view| view.selected_index())
            .unwrap_or(0);
    }

    fn choice_count(&self) -> usize {
        self.wizard
            .view()
            .map(|view| view.choices.len())
            .unwrap_or(0)
    }

    fn render(&self, frame: &mut Frame) {
        let Some(view) = self.wizard.view() else {
            return;
        };
        let language = self
            .wizard
            .session()
            .map(|session| session.language.as_str())
            .unwrap_or_default();
        let language = language_name(language).unwrap_or(language);

        screens::step::render(frame, &view, self.cursor, language, &self.theme);

        if let Some(notice) = &self.notice {
            let area = frame.area();
            modal::render_notice(frame, area, notice, &self.theme);
        }
    }
}
