//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `registration_form`: The registration form view

mod field_renderer;
mod registration_form;

pub use registration_form::draw_registration;
