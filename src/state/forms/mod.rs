//! Form domain layer
//!
//! Field state, validation rules, the debounced email check and the
//! registration form controller with its session lifecycle.

mod email_check;
mod field;
mod form_state;
mod session;
mod validators;

pub use email_check::{check_email_uniqueness, EmailCheckResolution, EmailCheckTicket};
pub use field::{FieldState, FieldStatus};
pub use form_state::{FieldKey, FormOptions, RegistrationForm, SubmitOutcome};
pub use session::FormSession;

#[cfg(test)]
pub use validators::FieldError;
