//! Persisted representation of a form and the mapping to and from the
//! in-memory model.
//!
//! Branch conditions are stored the way existing documents carry them:
//! `assertOn` holds the literal trigger in include mode and a bracketed,
//! comma separated set (`"[A, B]"`) in exclude mode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::branch::{BranchCondition, BranchRule, ConditionMode};
use crate::spec::form::{FormSpec, PageSpec};
use crate::spec::question::{Choice, QuestionSpec, QuestionType};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("branch '{branch_id}' is flagged as exclude but assertOn '{assert_on}' is not a bracketed list")]
    ExpectedBracketList { branch_id: String, assert_on: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pages: Vec<PageDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub next_page: Option<usize>,
    #[serde(default)]
    pub questions: Vec<QuestionDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<BranchDocument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    pub id: String,
    #[serde(default)]
    pub question_number: usize,
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceDocument>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_multi_select: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_file_types: Vec<String>,
    #[serde(
        default,
        rename = "maxFileSizeMB",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_file_size_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDocument {
    pub text: String,
    #[serde(default)]
    pub choice_number: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_other: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchDocument {
    pub id: String,
    pub question_number: usize,
    pub assert_on: String,
    pub target_page: usize,
    #[serde(default)]
    pub source_page: usize,
    /// Absent in older documents, where the brackets alone mark exclude mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,
}

impl FormDocument {
    pub fn from_json(raw: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes into the in-memory model and re-establishes numbering.
    pub fn into_spec(self) -> Result<FormSpec, WireError> {
        let mut pages = Vec::with_capacity(self.pages.len());
        for (page_idx, page) in self.pages.into_iter().enumerate() {
            pages.push(decode_page(page_idx, page)?);
        }
        let mut form = FormSpec {
            id: self.id,
            title: self.title,
            description: self.description,
            pages,
        };
        form.renumber();
        Ok(form)
    }
}

impl From<&FormSpec> for FormDocument {
    fn from(form: &FormSpec) -> Self {
        Self {
            id: form.id.clone(),
            title: form.title.clone(),
            description: form.description.clone(),
            pages: form
                .pages
                .iter()
                .enumerate()
                .map(|(idx, page)| encode_page(idx, page))
                .collect(),
        }
    }
}

/// Persisted `assertOn` text for a condition.
pub fn encode_assert_on(condition: &BranchCondition) -> String {
    match condition.mode {
        ConditionMode::Include => condition.values.first().cloned().unwrap_or_default(),
        ConditionMode::Exclude => format!("[{}]", condition.values.join(", ")),
    }
}

/// Reads a persisted `assertOn`. Without an explicit flag the brackets decide.
pub fn decode_assert_on(
    branch_id: &str,
    assert_on: &str,
    exclude: Option<bool>,
) -> Result<BranchCondition, WireError> {
    let bracketed = bracket_list(assert_on);
    match (exclude, bracketed) {
        (Some(false), _) | (None, None) => Ok(BranchCondition::include(assert_on)),
        (Some(true) | None, Some(values)) => Ok(BranchCondition::exclude(values)),
        (Some(true), None) => Err(WireError::ExpectedBracketList {
            branch_id: branch_id.to_string(),
            assert_on: assert_on.to_string(),
        }),
    }
}

fn bracket_list(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn encode_page(idx: usize, page: &PageSpec) -> PageDocument {
    PageDocument {
        title: page.title.clone(),
        description: page.description.clone(),
        next_page: Some(page.linear_next(idx)),
        questions: page.questions.iter().map(encode_question).collect(),
        branches: (!page.branches.is_empty()).then(|| {
            page.branches
                .iter()
                .map(|branch| BranchDocument {
                    id: branch.id.clone(),
                    question_number: branch.question_number,
                    assert_on: encode_assert_on(&branch.condition),
                    target_page: branch.target_page,
                    source_page: idx,
                    exclude: Some(branch.condition.mode == ConditionMode::Exclude),
                })
                .collect()
        }),
    }
}

fn encode_question(question: &QuestionSpec) -> QuestionDocument {
    QuestionDocument {
        id: question.id.clone(),
        question_number: question.question_number,
        text: question.text.clone(),
        question_type: question.kind,
        is_mandatory: question.mandatory,
        choices: question
            .choices
            .iter()
            .map(|choice| ChoiceDocument {
                text: choice.text.clone(),
                choice_number: choice.choice_number,
                is_other: choice.is_other,
            })
            .collect(),
        is_multi_select: question.multi_select,
        max_length: question.max_length,
        min_date: question.min_date.clone(),
        max_date: question.max_date.clone(),
        allowed_file_types: question.allowed_file_types.clone(),
        max_file_size_mb: question.max_file_size_mb,
        allow_multiple: question.allow_multiple,
    }
}

fn decode_page(idx: usize, page: PageDocument) -> Result<PageSpec, WireError> {
    let mut branches = Vec::new();
    for branch in page.branches.unwrap_or_default() {
        let condition = decode_assert_on(&branch.id, &branch.assert_on, branch.exclude)?;
        branches.push(BranchRule {
            id: branch.id,
            source_page: idx,
            question_number: branch.question_number,
            condition,
            target_page: branch.target_page,
        });
    }
    Ok(PageSpec {
        title: page.title,
        description: page.description,
        questions: page.questions.into_iter().map(decode_question).collect(),
        next_page: page.next_page.filter(|next| *next != idx + 1),
        branches,
    })
}

fn decode_question(question: QuestionDocument) -> QuestionSpec {
    QuestionSpec {
        id: question.id,
        question_number: question.question_number,
        text: question.text,
        kind: question.question_type,
        mandatory: question.is_mandatory,
        choices: question
            .choices
            .into_iter()
            .map(|choice| Choice {
                text: choice.text,
                choice_number: choice.choice_number,
                is_other: choice.is_other,
            })
            .collect(),
        multi_select: question.is_multi_select,
        max_length: question.max_length,
        min_date: question.min_date,
        max_date: question.max_date,
        allowed_file_types: question.allowed_file_types,
        max_file_size_mb: question.max_file_size_mb,
        allow_multiple: question.allow_multiple,
    }
}
