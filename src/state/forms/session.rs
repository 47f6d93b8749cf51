//! Form session lifecycle
//!
//! A session owns at most one [`RegistrationForm`]. `create_form` builds it
//! on the first call and hands back the same form afterwards; `teardown`
//! drops it, after which late check results are discarded. Check numbering
//! carries over from one form to the next so a result issued for a torn-down
//! form can never match a check of its successor.

use super::email_check::EmailCheckResolution;
use super::form_state::{FormOptions, RegistrationForm};

#[derive(Debug, Default)]
pub struct FormSession {
    options: FormOptions,
    form: Option<RegistrationForm>,
    /// Highest check sequence issued by any earlier form
    last_seq: u64,
}

impl FormSession {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            form: None,
            last_seq: 0,
        }
    }

    /// Build the form if it does not exist yet and return it
    pub fn create_form(&mut self) -> &mut RegistrationForm {
        let options = self.options;
        let last_seq = self.last_seq;
        self.form.get_or_insert_with(|| {
            tracing::debug!(last_seq, "creating registration form");
            let mut form = RegistrationForm::new(options);
            form.resume_email_checks_after(last_seq);
            form
        })
    }

    pub fn form(&self) -> Option<&RegistrationForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RegistrationForm> {
        self.form.as_mut()
    }

    /// Route a finished uniqueness check to the live form. Returns whether
    /// it was applied.
    pub fn deliver(&mut self, resolution: EmailCheckResolution) -> bool {
        match self.form.as_mut() {
            Some(form) => form.resolve_email_check(resolution),
            None => {
                tracing::debug!(seq = resolution.seq, "form torn down, dropping email check");
                false
            }
        }
    }

    /// Drop the form and everything pending on it
    pub fn teardown(&mut self) {
        if let Some(form) = self.form.take() {
            self.last_seq = self.last_seq.max(form.last_email_check_seq());
            tracing::debug!(last_seq = self.last_seq, "registration form torn down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FieldKey, FieldStatus};
    use std::time::{Duration, Instant};

    #[test]
    fn test_create_form_is_idempotent() {
        let mut session = FormSession::default();
        assert!(session.form().is_none());

        session.create_form().set_value(FieldKey::Name, "Alice");
        session.create_form().add_hobby();

        let form = session.form().unwrap();
        assert_eq!(form.value(FieldKey::Name), "Alice");
        assert_eq!(form.hobbies().len(), 2);
    }

    #[test]
    fn test_resolution_after_teardown_is_dropped() {
        let start = Instant::now();
        let mut session = FormSession::default();
        let form = session.create_form();
        form.set_value_at(FieldKey::Email, "late@example.com", start);
        let ticket = form
            .take_due_email_check(start + Duration::from_millis(500))
            .unwrap();

        session.teardown();
        assert!(session.form().is_none());
        assert!(!session.deliver(EmailCheckResolution {
            seq: ticket.seq,
            outcome: Ok(true),
        }));
    }

    #[test]
    fn test_recreated_form_starts_fresh() {
        let mut session = FormSession::default();
        session.create_form().set_value(FieldKey::Name, "Alice");
        session.teardown();
        assert_eq!(session.create_form().value(FieldKey::Name), "");
    }

    #[test]
    fn test_check_from_torn_down_form_never_reaches_successor() {
        let start = Instant::now();
        let due = start + Duration::from_millis(500);
        let mut session = FormSession::default();

        let form = session.create_form();
        form.set_value_at(FieldKey::Email, "old@example.com", start);
        let old = form.take_due_email_check(due).unwrap();
        session.teardown();

        let form = session.create_form();
        form.set_value_at(FieldKey::Email, "new@example.com", start);
        let new = form.take_due_email_check(due).unwrap();
        assert!(new.seq > old.seq);

        // Old answer arrives first and must not mark the new address taken
        assert!(!session.deliver(EmailCheckResolution {
            seq: old.seq,
            outcome: Ok(true),
        }));
        let form = session.form().unwrap();
        assert_eq!(form.status(FieldKey::Email), Some(FieldStatus::Pending));

        assert!(session.deliver(EmailCheckResolution {
            seq: new.seq,
            outcome: Ok(false),
        }));
        assert_eq!(
            session.form().unwrap().status(FieldKey::Email),
            Some(FieldStatus::Valid)
        );
    }
}
