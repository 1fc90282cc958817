use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::Answer;

/// How a branch condition compares the answer with its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionMode {
    /// Jump when the answer is one of `values`.
    Include,
    /// Jump when the answer is not one of `values`.
    Exclude,
}

/// Condition attached to a branch rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BranchCondition {
    pub mode: ConditionMode,
    #[serde(default)]
    pub values: Vec<String>,
}

impl BranchCondition {
    pub fn include(value: impl Into<String>) -> Self {
        Self {
            mode: ConditionMode::Include,
            values: vec![value.into()],
        }
    }

    pub fn exclude<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: ConditionMode::Exclude,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the exclude condition that fires for exactly the `chosen` members
    /// of `universe`: the stored set is the complement of `chosen`.
    pub fn trigger_on<'a>(
        universe: impl IntoIterator<Item = &'a str>,
        chosen: &[String],
    ) -> Self {
        let values = universe
            .into_iter()
            .filter(|candidate| !chosen.iter().any(|picked| picked == candidate))
            .map(str::to_string)
            .collect();
        Self {
            mode: ConditionMode::Exclude,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|value| value.trim().is_empty())
    }

    /// Evaluates the condition. Array answers hold in include mode when any
    /// selected item is listed, and in exclude mode when any selected item is
    /// not listed.
    pub fn holds(&self, answer: &Answer) -> bool {
        let items = answer.items();
        if items.is_empty() {
            return false;
        }
        let listed = |item: &String| self.values.iter().any(|value| value == item);
        match self.mode {
            ConditionMode::Include => items.iter().any(listed),
            ConditionMode::Exclude => !items.iter().all(listed),
        }
    }
}

/// Conditional redirect from the owning page to `target_page`.
///
/// `question_number` is the 1-based position of the keyed question within
/// `source_page`, not the global question number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BranchRule {
    pub id: String,
    pub source_page: usize,
    pub question_number: usize,
    pub condition: BranchCondition,
    pub target_page: usize,
}
