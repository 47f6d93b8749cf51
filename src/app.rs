//! Application state and core logic

use crate::api::UsersApi;
use crate::config::AppConfig;
use crate::platform::ACTION_MODIFIER;
use crate::state::{
    check_email_uniqueness, EmailCheckResolution, EmailCheckTicket, FieldKey, FieldState,
    FormOptions, FormSession, RegistrationForm, SubmitOutcome, Technology,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Focusable element of the registration view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldKey),
    Submit,
}

/// Main application struct
pub struct App {
    /// Registration form session
    pub session: FormSession,
    /// Users API used for checks and submission
    api: Arc<dyn UsersApi>,
    /// Focused element
    pub focus: Focus,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar until the next key press
    pub status_message: Option<String>,
    /// Errors waiting to be shown, oldest first
    errors: VecDeque<String>,
    check_tx: mpsc::UnboundedSender<EmailCheckResolution>,
    check_rx: mpsc::UnboundedReceiver<EmailCheckResolution>,
    /// Uniqueness check currently on the wire
    in_flight: Option<JoinHandle<()>>,
}

impl App {
    /// Create a new App instance from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = config.users_client()?;
        tracing::info!("Using users API at {}", client.base_url());
        Ok(Self::with_api(Arc::new(client), config.form_options()))
    }

    /// Create an App talking to `api`
    pub fn with_api(api: Arc<dyn UsersApi>, options: FormOptions) -> Self {
        let mut session = FormSession::new(options);
        session.create_form();
        let (check_tx, check_rx) = mpsc::unbounded_channel();

        Self {
            session,
            api,
            focus: Focus::Field(FieldKey::Name),
            quit: false,
            status_message: None,
            errors: VecDeque::new(),
            check_tx,
            check_rx,
            in_flight: None,
        }
    }

    pub fn form(&self) -> Option<&RegistrationForm> {
        self.session.form()
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push_back(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown in the dialog
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    /// Errors waiting behind the one shown
    pub fn queued_errors(&self) -> usize {
        self.errors.len().saturating_sub(1)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Enabled fields in display order, then the submit button
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order: Vec<Focus> = self
            .session
            .form()
            .map(|form| {
                form.field_keys()
                    .into_iter()
                    .filter(|key| form.field(*key).is_some_and(FieldState::is_enabled))
                    .map(Focus::Field)
                    .collect()
            })
            .unwrap_or_default();
        order.push(Focus::Submit);
        order
    }

    fn move_focus(&mut self, step: isize) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(order.len() as isize) as usize;
        self.focus = order[next];
    }

    pub fn next_focus(&mut self) {
        self.move_focus(1);
    }

    pub fn prev_focus(&mut self) {
        self.move_focus(-1);
    }

    /// Apply finished checks and send any that became due
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        while let Ok(resolution) = self.check_rx.try_recv() {
            self.session.deliver(resolution);
        }

        let due = self
            .session
            .form_mut()
            .and_then(|form| form.take_due_email_check(now));
        if let Some(ticket) = due {
            self.dispatch_email_check(ticket);
        }
    }

    fn dispatch_email_check(&mut self, ticket: EmailCheckTicket) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let api = Arc::clone(&self.api);
        let tx = self.check_tx.clone();
        tracing::debug!(seq = ticket.seq, "sending email check");

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = check_email_uniqueness(api.as_ref(), &ticket.email).await;
            // A closed channel means the app is gone
            let _ = tx.send(EmailCheckResolution {
                seq: ticket.seq,
                outcome,
            });
        }));
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        let now = Instant::now();
        let on_submit = self.focus == Focus::Submit;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.prev_focus(),
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('s') if ctrl => self.submit().await,
            KeyCode::Char('n') if key.modifiers.contains(ACTION_MODIFIER) => self.add_hobby(),
            KeyCode::Char('d') if key.modifiers.contains(ACTION_MODIFIER) => {
                self.remove_focused_hobby()
            }
            KeyCode::Enter if on_submit => self.submit().await,
            KeyCode::Enter => self.next_focus(),
            KeyCode::Left => self.cycle_option(false, now),
            KeyCode::Right => self.cycle_option(true, now),
            KeyCode::Char(c) if !ctrl => {
                if let Focus::Field(field) = self.focus {
                    if !field.is_select() {
                        self.session.create_form().push_char(field, c, now);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Focus::Field(field) = self.focus {
                    let form = self.session.create_form();
                    if field.is_select() {
                        form.set_value_at(field, "", now);
                    } else {
                        form.pop_char(field, now);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Step through the choices of a select field
    fn cycle_option(&mut self, forward: bool, now: Instant) {
        let Focus::Field(field) = self.focus else {
            return;
        };
        let form = self.session.create_form();
        let options: Vec<&'static str> = match field {
            FieldKey::Technology => Technology::ALL.iter().map(Technology::as_str).collect(),
            FieldKey::TechnologyVersion => form.version_options().to_vec(),
            _ => return,
        };
        if options.is_empty() {
            return;
        }

        let len = options.len();
        let current = options.iter().position(|o| *o == form.value(field));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        form.set_value_at(field, options[next], now);
    }

    fn add_hobby(&mut self) {
        let index = self.session.create_form().add_hobby();
        self.focus = Focus::Field(FieldKey::Hobby(index));
    }

    fn remove_focused_hobby(&mut self) {
        let Focus::Field(FieldKey::Hobby(index)) = self.focus else {
            return;
        };
        let form = self.session.create_form();
        if form.remove_hobby(index) {
            let last = form.hobbies().len() - 1;
            self.focus = Focus::Field(FieldKey::Hobby(index.min(last)));
        } else {
            self.status_message = Some("At least one hobby is required".to_string());
        }
    }

    /// Submit the form and report the outcome
    async fn submit(&mut self) {
        let api = Arc::clone(&self.api);
        let result = self.session.create_form().submit(api.as_ref()).await;
        match result {
            Ok(SubmitOutcome::Submitted(user)) => {
                self.focus = Focus::Field(FieldKey::Name);
                self.status_message = Some(format!("Registered! (id {})", user.id));
            }
            Ok(SubmitOutcome::Rejected) => {
                self.status_message =
                    Some("Fix the highlighted fields before submitting".to_string());
            }
            Err(e) => self.push_error(format!("Failed to submit registration: {e}")),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.session.teardown();
    }
}
