#![allow(missing_docs)]

pub mod answers;
pub mod invariants;
pub mod memory;
pub mod services;
pub mod spec;
pub mod validate;
pub mod validators;
pub mod wire;

pub use answers::{Answer, AnswerCheck, AnswerIssue, AnswerMap, OTHER_PREFIX};
pub use invariants::BranchAnchors;
pub use services::{
    FileSelection, FileStorage, FormStore, Submission, SubmissionService, SubmittedAnswer,
    TransportError,
};
pub use spec::{
    BranchCondition, BranchRule, Choice, ConditionMode, FormSpec, PageSpec, QuestionSpec,
    QuestionType,
};
pub use validate::{FormReport, PageErrors, validate};
pub use validators::validate_answer;
pub use wire::{FormDocument, WireError};
