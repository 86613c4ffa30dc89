//! Application state and core logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::api::{self, ApiError, SharedApi};
use crate::config::TuiConfig;
use crate::state::forms::{
    CompletionNotice, CreateClassFlow, CreateStudentFlow, EditStudentFlow, FocusSlot,
    FooterButton, Form, SubmitReceipt, SubmitTicket, TicketKey, WizardFlow, WizardForm,
    WizardShell,
};
use crate::state::{AppState, HomeAction, ListState, LookupOption, LookupSource, Student, View};

/// Results of background work, delivered to the event loop
#[derive(Debug)]
pub enum AppEvent {
    LookupLoaded {
        wizard_id: Uuid,
        source: LookupSource,
        result: Result<Vec<LookupOption>, ApiError>,
    },
    Submitted {
        key: TicketKey,
        result: Result<SubmitReceipt, ApiError>,
    },
    /// Sent by a wizard's completion callback
    EntitySaved(CompletionNotice),
    StudentsLoaded(Result<Vec<Student>, ApiError>),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// The open wizard, drawn over the current view
    pub wizard: Option<WizardForm>,
    api: SharedApi,
    auto_close: Duration,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(api: SharedApi, config: &TuiConfig) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let state = AppState {
            using_fixtures: config.fixtures_enabled(),
            ..AppState::default()
        };
        Self {
            state,
            wizard: None,
            api,
            auto_close: config.auto_close(),
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Start loading the student list
    pub fn load_students(&mut self) {
        self.state.students_state = ListState::Loading;
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_students().await;
            let _ = tx.send(AppEvent::StudentsLoaded(result));
        });
    }

    /// Open a wizard and start its dropdown preloads
    pub fn open_wizard(&mut self, flow: Arc<dyn WizardFlow>) {
        let tx = self.events_tx.clone();
        let mut shell = WizardShell::new(flow, self.auto_close).with_on_complete(move |notice| {
            let _ = tx.send(AppEvent::EntitySaved(notice.clone()));
        });
        let sources = shell.open();
        let wizard_id = shell.id();
        self.wizard = Some(WizardForm::new(shell));

        for source in sources {
            self.spawn_lookup(wizard_id, source);
        }
    }

    fn spawn_lookup(&self, wizard_id: Uuid, source: LookupSource) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api::fetch_lookup(api.as_ref(), source).await;
            let _ = tx.send(AppEvent::LookupLoaded {
                wizard_id,
                source,
                result,
            });
        });
    }

    fn spawn_submit(&self, ticket: SubmitTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = ticket.execute(api.as_ref()).await;
            let _ = tx.send(AppEvent::Submitted {
                key: ticket.key(),
                result,
            });
        });
    }

    /// Apply every background result that has arrived
    pub fn drain_events(&mut self, now: Instant) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event, now);
        }
    }

    fn handle_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::LookupLoaded {
                wizard_id,
                source,
                result,
            } => match self.wizard.as_mut() {
                Some(form) => {
                    form.shell.apply_lookup(wizard_id, source, result);
                }
                None => tracing::debug!(source = source.label(), "lookup arrived after close"),
            },
            AppEvent::Submitted { key, result } => match self.wizard.as_mut() {
                Some(form) => {
                    form.shell.resolve_submit(key, result, now);
                }
                None => {
                    tracing::debug!(
                        wizard = %key.wizard_id,
                        "submission result arrived after close"
                    )
                }
            },
            AppEvent::EntitySaved(notice) => {
                let verb = if notice.kind.is_edit() { "updated" } else { "created" };
                self.state.set_status(
                    format!("{} {} {verb}", notice.kind.entity(), notice.label),
                    now,
                );
                self.state.record_completion(notice);
                self.load_students();
            }
            AppEvent::StudentsLoaded(Ok(students)) => {
                tracing::debug!(count = students.len(), "students loaded");
                self.state.set_students(students);
            }
            AppEvent::StudentsLoaded(Err(error)) => {
                tracing::warn!(%error, "could not load students");
                self.state.students_state = ListState::Failed(error.friendly_message());
            }
        }
    }

    /// Advance timers. Drops the wizard once it has auto-closed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(form) = self.wizard.as_mut() {
            if form.shell.tick(now) {
                self.wizard = None;
            }
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.wizard.is_some() {
            self.handle_wizard_key(key);
            return Ok(());
        }

        match self.state.current_view {
            View::Home => self.handle_home_key(key),
            View::Students => self.handle_students_key(key),
        }
        Ok(())
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state.current_view = view;
        self.state.reset_selection();
        if view == View::Students && self.state.students_state == ListState::NotLoaded {
            self.load_students();
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(self.state.row_count())
            }
            KeyCode::Char('c') => self.open_wizard(Arc::new(CreateClassFlow::new())),
            KeyCode::Char('n') => self.open_wizard(Arc::new(CreateStudentFlow::new())),
            KeyCode::Char('s') => self.navigate(View::Students),
            KeyCode::Enter => match self.state.selected_action() {
                Some(HomeAction::NewClass) => self.open_wizard(Arc::new(CreateClassFlow::new())),
                Some(HomeAction::NewStudent) => {
                    self.open_wizard(Arc::new(CreateStudentFlow::new()))
                }
                Some(HomeAction::BrowseStudents) => self.navigate(View::Students),
                None => {}
            },
            _ => {}
        }
    }

    fn handle_students_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.navigate(View::Home),
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(self.state.row_count())
            }
            KeyCode::Char('r') => self.load_students(),
            KeyCode::Char('n') => self.open_wizard(Arc::new(CreateStudentFlow::new())),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(student) = self.state.selected_student().cloned() {
                    self.open_wizard(Arc::new(EditStudentFlow::new(student)));
                }
            }
            _ => {}
        }
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(crate::platform::ACTION_MODIFIER);
        let Some(form) = self.wizard.as_mut() else {
            return;
        };

        if form.shell.status().is_busy() {
            if key.code == KeyCode::Esc {
                self.state
                    .set_status("Wait for the submission to finish", Instant::now());
            }
            return;
        }
        if form.shell.status().is_done() {
            // the wizard is about to close; let the user skip the wait
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.cancel_wizard();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if !form.shell.dismiss_banner() {
                    self.cancel_wizard();
                }
            }
            KeyCode::Char('n') if ctrl => self.wizard_primary(),
            KeyCode::Char('p') if ctrl => {
                if form.shell.previous() {
                    form.reset_focus();
                }
            }
            KeyCode::Char('a') if ctrl => form.add_entry(),
            KeyCode::Char('d') if ctrl => form.remove_entry(),
            KeyCode::F(n) => {
                if form.shell.go_to(usize::from(n)) {
                    form.reset_focus();
                }
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Left if form.is_footer_active() => form.prev_button(),
            KeyCode::Right if form.is_footer_active() => form.next_button(),
            KeyCode::Left => form.cycle_option(false),
            KeyCode::Right => form.cycle_option(true),
            KeyCode::Enter if form.is_footer_active() => match form.selected_button {
                FooterButton::Previous => {
                    if form.shell.previous() {
                        form.reset_focus();
                    }
                }
                FooterButton::Cancel => self.cancel_wizard(),
                FooterButton::Primary => self.wizard_primary(),
            },
            KeyCode::Enter if form.is_active_field_multiline() => form.type_char('\n'),
            KeyCode::Enter => form.next_field(),
            KeyCode::Char(c) if !ctrl => form.type_char(c),
            KeyCode::Backspace => form.backspace(),
            _ => {}
        }
    }

    /// Next on intermediate steps, Submit on the last one
    fn wizard_primary(&mut self) {
        let Some(form) = self.wizard.as_mut() else {
            return;
        };

        if !form.shell.is_terminal_step() {
            if form.shell.next() {
                form.reset_focus();
            } else {
                form.focus_first_error();
            }
            return;
        }

        match form.shell.begin_submit() {
            Some(ticket) => self.spawn_submit(ticket),
            None => form.focus_first_error(),
        }
    }

    fn cancel_wizard(&mut self) {
        let Some(form) = self.wizard.as_mut() else {
            return;
        };
        match form.shell.close() {
            Ok(()) => self.wizard = None,
            Err(error) => self.state.set_status(error.to_string(), Instant::now()),
        }
    }

    /// Slot with keyboard focus in the open wizard, for the renderer
    pub fn wizard_focus(&self) -> Option<FocusSlot> {
        self.wizard.as_ref().map(WizardForm::active_slot)
    }
}
