pub mod branch;
pub mod form;
pub mod question;

pub use branch::{BranchCondition, BranchRule, ConditionMode};
pub use form::{FormSpec, PageSpec};
pub use question::{Choice, QuestionSpec, QuestionType};
