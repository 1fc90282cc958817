use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Prefix tagging the free text entered for an MCQ "Other" choice.
pub const OTHER_PREFIX: &str = "Other: ";

/// Respondent-entered value. Its shape depends on the question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    List(Vec<String>),
    Number(f64),
}

impl Answer {
    /// Encodes free text typed into the "Other" control.
    pub fn other(text: &str) -> String {
        format!("{OTHER_PREFIX}{text}")
    }

    /// Splits an `"Other: <freetext>"` value back into its free text.
    pub fn split_other(value: &str) -> Option<&str> {
        value.strip_prefix(OTHER_PREFIX)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(text) => text.trim().is_empty(),
            Answer::List(items) => items.is_empty(),
            Answer::Number(_) => false,
        }
    }

    /// Answer flattened to comparable items, used by branch conditions.
    pub fn items(&self) -> Vec<String> {
        match self {
            Answer::Text(text) if text.is_empty() => Vec::new(),
            Answer::Text(text) => vec![text.clone()],
            Answer::List(items) => items.clone(),
            Answer::Number(value) => vec![value.to_string()],
        }
    }

    /// String form handed to the submission collaborator.
    pub fn to_submission_string(&self) -> String {
        match self {
            Answer::Text(text) => text.clone(),
            Answer::List(items) => items.join(","),
            Answer::Number(value) => value.to_string(),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(value: Vec<String>) -> Self {
        Answer::List(value)
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Answer::Number(value)
    }
}

/// Accumulated answers keyed by question id.
pub type AnswerMap = BTreeMap<String, Answer>;

/// Single failed check reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerIssue {
    pub code: String,
    pub message: String,
}

/// Result of running a per-question validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerCheck {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<AnswerIssue>,
}

impl AnswerCheck {
    pub fn pass() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, code: &str, message: impl Into<String>) {
        self.valid = false;
        self.issues.push(AnswerIssue {
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn messages(&self) -> Vec<&str> {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}
