//! Form field value objects

use super::validators::{FieldError, Rule};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Whether a field takes part in validation and submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    #[default]
    Active,
    /// Value reset to default, counts as valid, left out of the payload
    Disabled,
    /// Value kept, counts as valid, left out of the payload
    DisabledRetained,
}

/// Validation status derived from a field's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Valid,
    Invalid,
    Pending,
    Disabled,
}

/// Represents a single form field with its rules, value and errors
#[derive(Debug, Clone)]
pub struct FieldState {
    pub label: String,
    value: String,
    rules: Vec<Rule>,
    errors: BTreeSet<FieldError>,
    mode: FieldMode,
    /// An asynchronous check is outstanding
    pending: bool,
    /// Edited by the user, or a submit was attempted
    pub touched: bool,
}

impl FieldState {
    /// Create an active, empty field and run its rules once
    pub fn new(label: &str, rules: Vec<Rule>, today: NaiveDate) -> Self {
        let mut field = Self {
            label: label.to_string(),
            value: String::new(),
            rules,
            errors: BTreeSet::new(),
            mode: FieldMode::Active,
            pending: false,
            touched: false,
        };
        field.revalidate(today);
        field
    }

    /// Create a field that starts disabled
    pub fn disabled(label: &str, rules: Vec<Rule>) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            rules,
            errors: BTreeSet::new(),
            mode: FieldMode::Disabled,
            pending: false,
            touched: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == FieldMode::Active
    }

    pub fn errors(&self) -> &BTreeSet<FieldError> {
        &self.errors
    }

    pub fn status(&self) -> FieldStatus {
        if !self.is_enabled() {
            FieldStatus::Disabled
        } else if !self.errors.is_empty() {
            FieldStatus::Invalid
        } else if self.pending {
            FieldStatus::Pending
        } else {
            FieldStatus::Valid
        }
    }

    /// Disabled fields always count as valid
    pub fn is_valid(&self) -> bool {
        matches!(self.status(), FieldStatus::Valid | FieldStatus::Disabled)
    }

    /// Run the synchronous rules against `value` without touching the field
    pub fn check(&self, value: &str, today: NaiveDate) -> BTreeSet<FieldError> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(value, today))
            .collect()
    }

    /// Replace the value and recompute synchronous errors.
    /// Clears any asynchronous result; the caller reschedules it.
    pub fn set_value(&mut self, value: String, today: NaiveDate) {
        self.value = value;
        self.pending = false;
        self.revalidate(today);
    }

    pub fn revalidate(&mut self, today: NaiveDate) {
        self.errors = if self.is_enabled() {
            self.check(&self.value, today)
        } else {
            BTreeSet::new()
        };
    }

    /// Record an error produced outside the synchronous rules
    pub fn add_error(&mut self, error: FieldError) {
        if self.is_enabled() {
            self.errors.insert(error);
        }
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending && self.is_enabled();
    }

    /// Clear value and interaction state, keeping the mode
    pub fn reset(&mut self, today: NaiveDate) {
        self.value.clear();
        self.pending = false;
        self.touched = false;
        self.revalidate(today);
    }

    pub fn enable(&mut self, today: NaiveDate) {
        self.mode = FieldMode::Active;
        self.revalidate(today);
    }

    /// Disable the field. With `retain_value` the current value is kept.
    pub fn disable(&mut self, retain_value: bool) {
        if retain_value {
            self.mode = FieldMode::DisabledRetained;
        } else {
            self.mode = FieldMode::Disabled;
            self.value.clear();
        }
        self.pending = false;
        self.errors.clear();
    }

    /// First error message, for display
    pub fn first_error(&self) -> Option<String> {
        self.errors.iter().next().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn name_field() -> FieldState {
        FieldState::new(
            "Name",
            vec![Rule::Required, Rule::MinLength(4), Rule::MaxLength(64)],
            today(),
        )
    }

    #[test]
    fn test_new_field_is_required_and_invalid() {
        let field = name_field();
        assert_eq!(field.value(), "");
        assert!(field.errors().contains(&FieldError::Required));
        assert_eq!(field.status(), FieldStatus::Invalid);
        assert!(!field.touched);
    }

    #[test]
    fn test_set_value_recomputes_errors() {
        let mut field = name_field();
        field.set_value("Bob".to_string(), today());
        assert_eq!(
            field.errors().iter().map(FieldError::code).collect::<Vec<_>>(),
            vec!["minLength"]
        );
        field.set_value("Alice".to_string(), today());
        assert_eq!(field.status(), FieldStatus::Valid);
    }

    #[test]
    fn test_disabled_field_is_valid_and_cleared() {
        let mut field = name_field();
        field.set_value("abc".to_string(), today());
        field.disable(false);
        assert_eq!(field.value(), "");
        assert_eq!(field.status(), FieldStatus::Disabled);
        assert!(field.is_valid());
    }

    #[test]
    fn test_disable_retaining_keeps_value() {
        let mut field = name_field();
        field.set_value("abc".to_string(), today());
        field.disable(true);
        assert_eq!(field.value(), "abc");
        assert_eq!(field.mode, FieldMode::DisabledRetained);
        assert!(field.errors().is_empty());

        field.enable(today());
        assert_eq!(field.status(), FieldStatus::Invalid);
    }

    #[test]
    fn test_async_error_ignored_while_disabled() {
        let mut field = FieldState::disabled("Version", vec![Rule::Required]);
        field.add_error(FieldError::EmailExists);
        field.set_pending(true);
        assert!(field.errors().is_empty());
        assert!(!field.pending);
    }

    #[test]
    fn test_pending_field_is_not_valid() {
        let mut field = FieldState::new("Email", vec![Rule::Email], today());
        field.set_value("a@b.io".to_string(), today());
        field.set_pending(true);
        assert_eq!(field.status(), FieldStatus::Pending);
        assert!(!field.is_valid());
    }

    #[test]
    fn test_reset_clears_touched_and_value() {
        let mut field = name_field();
        field.touched = true;
        field.set_value("Alice".to_string(), today());
        field.reset(today());
        assert_eq!(field.value(), "");
        assert!(!field.touched);
        assert_eq!(field.first_error().as_deref(), Some("This field is required"));
    }
}
