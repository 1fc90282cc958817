//! Structural editor for multi-page conditional questionnaires.
//!
//! [`EditorSession`] applies atomic mutations to a [`formflow_spec::FormSpec`]
//! and re-establishes its invariants after each one: dense global question
//! numbers, dense per-question choice numbers, and branch rules that keep
//! pointing at the question and pages they were written against.

mod branches;
mod choices;
mod clipboard;
mod pages;
mod persist;
mod questions;
mod session;

pub use branches::BranchEdit;
pub use pages::PageField;
pub use persist::{LoadError, SaveError};
pub use questions::QuestionField;
pub use session::{Direction, EditorSession};
