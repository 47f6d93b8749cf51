//! Application state module

mod catalog;
mod forms;
mod record;

pub use catalog::*;
pub use forms::*;
pub use record::*;
