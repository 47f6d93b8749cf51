//! Registration form state and its controller
//!
//! `RegistrationForm` owns every field, runs the synchronous rules on each
//! edit, drives the dependent technology/version pair through change hooks,
//! keeps the hobby list non-empty and turns a valid form into a
//! [`SubmissionRecord`].

use super::email_check::{EmailCheck, EmailCheckResolution, EmailCheckTicket, DEFAULT_DEBOUNCE};
use super::field::{FieldState, FieldStatus};
use super::validators::{self, FieldError, Rule, CANONICAL_DATE_FORMAT};
use crate::api::{ApiError, UsersApi};
use crate::state::catalog;
use crate::state::{HobbyRecord, SubmissionRecord, User};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

pub const NAME_MIN_LENGTH: usize = 4;
pub const NAME_MAX_LENGTH: usize = 64;
pub const HOBBY_MIN_LENGTH: usize = 4;
pub const DEFAULT_HOBBY_MAX_LENGTH: usize = 20;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 115;

/// Address of a field in the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Name,
    LastName,
    DateOfBirth,
    Technology,
    TechnologyVersion,
    Email,
    Hobby(usize),
}

impl FieldKey {
    /// Scalar fields in display order
    pub const SCALARS: [FieldKey; 6] = [
        FieldKey::Name,
        FieldKey::LastName,
        FieldKey::DateOfBirth,
        FieldKey::Technology,
        FieldKey::TechnologyVersion,
        FieldKey::Email,
    ];

    /// Fields edited by picking from a list rather than typing
    pub fn is_select(&self) -> bool {
        matches!(self, FieldKey::Technology | FieldKey::TechnologyVersion)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name => f.write_str("name"),
            FieldKey::LastName => f.write_str("lastName"),
            FieldKey::DateOfBirth => f.write_str("dateOfBirth"),
            FieldKey::Technology => f.write_str("technology"),
            FieldKey::TechnologyVersion => f.write_str("technologyVersion"),
            FieldKey::Email => f.write_str("email"),
            FieldKey::Hobby(i) => write!(f, "hobbies.{i}"),
        }
    }
}

/// Side effect run after a field's value changes, with the new value
pub type FieldHook = fn(&mut RegistrationForm, &str);

/// Tunables for a form session
#[derive(Debug, Clone, Copy)]
pub struct FormOptions {
    pub hobby_max_length: usize,
    pub email_debounce: Duration,
    pub min_age: u32,
    pub max_age: u32,
    /// Date that age rules are evaluated against
    pub today: fn() -> NaiveDate,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            hobby_max_length: DEFAULT_HOBBY_MAX_LENGTH,
            email_debounce: DEFAULT_DEBOUNCE,
            min_age: MIN_AGE,
            max_age: MAX_AGE,
            today: local_today,
        }
    }
}

/// Current date in the local timezone
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// What a submit attempt did
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The form was not valid; nothing was sent
    Rejected,
    /// The record was stored and the form reset
    Submitted(User),
}

#[derive(Clone)]
pub struct RegistrationForm {
    options: FormOptions,
    name: FieldState,
    last_name: FieldState,
    date_of_birth: FieldState,
    technology: FieldState,
    technology_version: FieldState,
    email: FieldState,
    /// Never empty
    hobbies: Vec<FieldState>,
    version_options: &'static [&'static str],
    email_check: EmailCheck,
    hooks: HashMap<FieldKey, Vec<FieldHook>>,
}

impl RegistrationForm {
    /// Build the form with empty values and one hobby field
    pub fn new(options: FormOptions) -> Self {
        let today = (options.today)();
        let name_rules = vec![
            Rule::Required,
            Rule::MinLength(NAME_MIN_LENGTH),
            Rule::MaxLength(NAME_MAX_LENGTH),
        ];

        let mut form = Self {
            options,
            name: FieldState::new("Name", name_rules.clone(), today),
            last_name: FieldState::new("Last Name", name_rules, today),
            date_of_birth: FieldState::new(
                "Date of Birth (yyyy-mm-dd)",
                vec![
                    Rule::Required,
                    Rule::AgeBetween {
                        min: options.min_age,
                        max: options.max_age,
                    },
                ],
                today,
            ),
            technology: FieldState::new("Technology", vec![Rule::Required], today),
            technology_version: FieldState::disabled("Version", vec![Rule::Required]),
            email: FieldState::new("Email", vec![Rule::Required, Rule::Email], today),
            hobbies: Vec::new(),
            version_options: &[],
            email_check: EmailCheck::new(options.email_debounce),
            hooks: HashMap::new(),
        };
        form.add_hobby();
        form.on_change(FieldKey::Technology, sync_technology_version);
        form
    }

    fn today(&self) -> NaiveDate {
        (self.options.today)()
    }

    fn hobby_field(&self) -> FieldState {
        FieldState::new(
            "Hobby",
            vec![
                Rule::Required,
                Rule::MinLength(HOBBY_MIN_LENGTH),
                Rule::MaxLength(self.options.hobby_max_length),
            ],
            self.today(),
        )
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldState> {
        match key {
            FieldKey::Name => Some(&self.name),
            FieldKey::LastName => Some(&self.last_name),
            FieldKey::DateOfBirth => Some(&self.date_of_birth),
            FieldKey::Technology => Some(&self.technology),
            FieldKey::TechnologyVersion => Some(&self.technology_version),
            FieldKey::Email => Some(&self.email),
            FieldKey::Hobby(i) => self.hobbies.get(i),
        }
    }

    fn field_mut(&mut self, key: FieldKey) -> Option<&mut FieldState> {
        match key {
            FieldKey::Name => Some(&mut self.name),
            FieldKey::LastName => Some(&mut self.last_name),
            FieldKey::DateOfBirth => Some(&mut self.date_of_birth),
            FieldKey::Technology => Some(&mut self.technology),
            FieldKey::TechnologyVersion => Some(&mut self.technology_version),
            FieldKey::Email => Some(&mut self.email),
            FieldKey::Hobby(i) => self.hobbies.get_mut(i),
        }
    }

    /// Value of a field, empty for unknown keys
    pub fn value(&self, key: FieldKey) -> &str {
        self.field(key).map_or("", FieldState::value)
    }

    pub fn hobbies(&self) -> &[FieldState] {
        &self.hobbies
    }

    /// Every field in display order, hobbies last
    pub fn field_keys(&self) -> Vec<FieldKey> {
        FieldKey::SCALARS
            .into_iter()
            .chain((0..self.hobbies.len()).map(FieldKey::Hobby))
            .collect()
    }

    /// Version choices for the current technology
    pub fn version_options(&self) -> &'static [&'static str] {
        self.version_options
    }

    /// Register a hook run after every value change of `key`
    pub fn on_change(&mut self, key: FieldKey, hook: FieldHook) {
        self.hooks.entry(key).or_default().push(hook);
    }

    #[allow(dead_code)]
    pub fn set_value(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        self.set_value_at(key, value, Instant::now())
    }

    /// Set a field's value as of `now`. Disabled and unknown fields are left
    /// alone and report `false`.
    pub fn set_value_at(&mut self, key: FieldKey, value: impl Into<String>, now: Instant) -> bool {
        let value = value.into();
        let today = self.today();
        let Some(field) = self.field_mut(key) else {
            return false;
        };
        if !field.is_enabled() {
            return false;
        }
        field.set_value(value.clone(), today);
        field.touched = true;

        if key == FieldKey::Email {
            self.refresh_email_check(now);
        }
        self.run_hooks(key, &value);
        true
    }

    pub fn push_char(&mut self, key: FieldKey, c: char, now: Instant) -> bool {
        let mut value = self.value(key).to_string();
        value.push(c);
        self.set_value_at(key, value, now)
    }

    pub fn pop_char(&mut self, key: FieldKey, now: Instant) -> bool {
        let mut value = self.value(key).to_string();
        if value.pop().is_none() {
            return false;
        }
        self.set_value_at(key, value, now)
    }

    fn run_hooks(&mut self, key: FieldKey, value: &str) {
        let hooks = self.hooks.get(&key).cloned().unwrap_or_default();
        for hook in hooks {
            hook(self, value);
        }
    }

    #[allow(dead_code)]
    pub fn enable(&mut self, key: FieldKey) {
        let today = self.today();
        if let Some(field) = self.field_mut(key) {
            field.enable(today);
        }
        if key == FieldKey::Email {
            self.refresh_email_check(Instant::now());
        }
    }

    #[allow(dead_code)]
    pub fn disable(&mut self, key: FieldKey, retain_value: bool) {
        if let Some(field) = self.field_mut(key) {
            field.disable(retain_value);
        }
        if key == FieldKey::Email {
            self.email_check.cancel();
        }
    }

    /// Errors for `key`: the synchronous rules evaluated now, plus the
    /// outcome of the last applied uniqueness check
    pub fn validate(&self, key: FieldKey) -> BTreeSet<FieldError> {
        let Some(field) = self.field(key) else {
            return BTreeSet::new();
        };
        if !field.is_enabled() {
            return BTreeSet::new();
        }
        let mut errors = field.check(field.value(), self.today());
        errors.extend(
            field
                .errors()
                .iter()
                .filter(|e| matches!(e, FieldError::EmailExists | FieldError::EmailUnverified))
                .cloned(),
        );
        errors
    }

    #[allow(dead_code)]
    pub fn errors(&self, key: FieldKey) -> Option<&BTreeSet<FieldError>> {
        self.field(key).map(FieldState::errors)
    }

    pub fn status(&self, key: FieldKey) -> Option<FieldStatus> {
        self.field(key).map(FieldState::status)
    }

    /// All enabled fields pass and no uniqueness check is outstanding
    pub fn is_valid(&self) -> bool {
        self.field_keys()
            .into_iter()
            .filter_map(|key| self.field(key))
            .all(FieldState::is_valid)
            && !self.email_check.is_outstanding()
    }

    pub fn mark_all_touched(&mut self) {
        for key in self.field_keys() {
            if let Some(field) = self.field_mut(key) {
                field.touched = true;
            }
        }
    }

    // Hobbies

    /// Append an empty hobby field and return its index
    pub fn add_hobby(&mut self) -> usize {
        let field = self.hobby_field();
        self.hobbies.push(field);
        self.hobbies.len() - 1
    }

    pub fn can_remove_hobby(&self) -> bool {
        self.hobbies.len() > 1
    }

    /// Remove the hobby at `index` unless it is the last one left
    pub fn remove_hobby(&mut self, index: usize) -> bool {
        if !self.can_remove_hobby() || index >= self.hobbies.len() {
            return false;
        }
        self.hobbies.remove(index);
        true
    }

    // Uniqueness check

    fn refresh_email_check(&mut self, now: Instant) {
        if self.email.is_enabled() && self.email.errors().is_empty() {
            self.email.set_pending(true);
            let seq = self
                .email_check
                .schedule(self.email.value().to_string(), now);
            tracing::debug!(seq, "email check scheduled");
        } else {
            self.email.set_pending(false);
            self.email_check.cancel();
        }
    }

    /// The uniqueness check to send now, if its debounce window has elapsed
    pub fn take_due_email_check(&mut self, now: Instant) -> Option<EmailCheckTicket> {
        self.email_check.take_due(now)
    }

    /// Last uniqueness check sequence number this form issued
    pub(super) fn last_email_check_seq(&self) -> u64 {
        self.email_check.latest_seq()
    }

    /// Number new checks after `seq`, so results for an earlier form never apply here
    pub(super) fn resume_email_checks_after(&mut self, seq: u64) {
        self.email_check.resume_after(seq);
    }

    /// Apply a finished uniqueness check. Results for superseded checks are
    /// dropped and `false` is returned.
    pub fn resolve_email_check(&mut self, resolution: EmailCheckResolution) -> bool {
        if !self.email_check.accept(resolution.seq) {
            return false;
        }
        self.email.set_pending(false);
        match resolution.outcome {
            Ok(true) => self.email.add_error(FieldError::EmailExists),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Email uniqueness check failed: {e}");
                self.email.add_error(FieldError::EmailUnverified);
            }
        }
        true
    }

    // Submission

    /// Snapshot of the form for the API, or `None` when it is not valid
    pub fn submission_record(&self) -> Option<SubmissionRecord> {
        if !self.is_valid() {
            return None;
        }
        let date_of_birth = validators::parse_date(self.date_of_birth.value())?
            .format(CANONICAL_DATE_FORMAT)
            .to_string();

        Some(SubmissionRecord {
            first_name: self.name.value().to_string(),
            last_name: self.last_name.value().to_string(),
            date_of_birth,
            framework: self.technology.value().to_string(),
            framework_version: self
                .technology_version
                .is_enabled()
                .then(|| self.technology_version.value().to_string()),
            email: self.email.value().to_string(),
            hobbies: self
                .hobbies
                .iter()
                .filter(|h| h.is_enabled())
                .map(|h| HobbyRecord {
                    name: h.value().to_string(),
                })
                .collect(),
        })
    }

    /// Send the form if it is valid. On success the form is reset; on
    /// failure it is left as it was so the user can retry.
    pub async fn submit(&mut self, api: &dyn UsersApi) -> Result<SubmitOutcome, ApiError> {
        let Some(record) = self.submission_record() else {
            self.mark_all_touched();
            for key in self.field_keys() {
                let codes: Vec<_> = self.validate(key).iter().map(FieldError::code).collect();
                if !codes.is_empty() {
                    tracing::debug!(field = %key, ?codes, "blocking submit");
                }
            }
            tracing::debug!("submit ignored, form is not valid");
            return Ok(SubmitOutcome::Rejected);
        };

        match api.create(&record).await {
            Ok(user) => {
                tracing::info!(id = %user.id, "registration submitted");
                self.reset();
                Ok(SubmitOutcome::Submitted(user))
            }
            Err(e) => {
                tracing::error!("Error submitting form: {e}");
                Err(e)
            }
        }
    }

    /// Return to the freshly created state: empty fields, version disabled,
    /// exactly one empty hobby. Registered hooks are kept.
    pub fn reset(&mut self) {
        let today = self.today();
        for field in [
            &mut self.name,
            &mut self.last_name,
            &mut self.date_of_birth,
            &mut self.technology,
            &mut self.email,
        ] {
            field.reset(today);
        }
        self.technology_version.reset(today);
        self.technology_version.disable(false);
        self.version_options = &[];
        self.email_check.cancel();
        self.hobbies.clear();
        self.add_hobby();
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new(FormOptions::default())
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name.value())
            .field("last_name", &self.last_name.value())
            .field("date_of_birth", &self.date_of_birth.value())
            .field("technology", &self.technology.value())
            .field("technology_version", &self.technology_version.value())
            .field("email", &self.email.value())
            .field("hobbies", &self.hobbies.len())
            .field("email_check", &self.email_check)
            .finish_non_exhaustive()
    }
}

/// Technology hook: offer the matching versions, clear and re-enable the version field
fn sync_technology_version(form: &mut RegistrationForm, technology: &str) {
    let today = form.today();
    form.version_options = catalog::versions_for(technology);
    form.technology_version.reset(today);
    form.technology_version.enable(today);
    tracing::debug!(
        technology,
        versions = form.version_options.len(),
        "technology changed"
    );
}
