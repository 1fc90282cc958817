//! Runtime side of a questionnaire.
//!
//! A [`Navigator`] walks a validated [`formflow_spec::FormSpec`] one page at
//! a time: it gates every transition on the per-question validators, picks
//! the next page from the page's branch rules and keeps the stack of pages
//! actually visited so that going back reverses a jump.

mod branch;
mod control;
mod navigator;
mod upload;

pub use branch::{firing_rule, resolve_next_page};
pub use control::{ControlInput, ControlRegistry, InputControl, QuestionControl};
pub use navigator::{Advance, Navigator, SubmitError};
pub use upload::UploadError;
