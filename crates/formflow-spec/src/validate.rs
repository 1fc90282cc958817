use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::branch::{BranchRule, ConditionMode};
use crate::spec::form::{FormSpec, PageSpec};
use crate::spec::question::{QuestionSpec, QuestionType};
use crate::validators::check_constraints;

/// Errors attached to one page and to its questions (keyed by in-page index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PageErrors {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub questions: BTreeMap<usize, Vec<String>>,
}

impl PageErrors {
    pub fn is_empty(&self) -> bool {
        self.page.is_empty() && self.questions.is_empty()
    }
}

/// Outcome of validating a whole form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormReport {
    pub has_errors: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub page_errors: BTreeMap<usize, PageErrors>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branch_errors: BTreeMap<String, Vec<String>>,
    pub sanitized_pages: Vec<PageSpec>,
}

impl FormReport {
    pub fn error_count(&self) -> usize {
        self.form_errors.len()
            + self
                .page_errors
                .values()
                .map(|errors| {
                    errors.page.len() + errors.questions.values().map(Vec::len).sum::<usize>()
                })
                .sum::<usize>()
            + self.branch_errors.values().map(Vec::len).sum::<usize>()
    }
}

/// Validates the form and returns every violation found, together with the
/// sanitized pages. Never stops at the first failure.
pub fn validate(form: &FormSpec) -> FormReport {
    let sanitized_pages = sanitize_pages(form);
    let page_count = sanitized_pages.len();

    let mut form_errors = Vec::new();
    if form.title.trim().is_empty() {
        form_errors.push("form title is required".to_string());
    }
    if sanitized_pages.is_empty() {
        form_errors.push("form has no pages".to_string());
    }

    let mut page_errors = BTreeMap::new();
    let mut branch_errors = BTreeMap::new();
    for (page_idx, page) in sanitized_pages.iter().enumerate() {
        let errors = check_page(page_idx, page, page_count);
        if !errors.is_empty() {
            page_errors.insert(page_idx, errors);
        }
        for branch in &page.branches {
            let errors = check_branch(page_idx, page, branch, page_count);
            if !errors.is_empty() {
                branch_errors.insert(branch.id.clone(), errors);
            }
        }
    }

    FormReport {
        has_errors: !form_errors.is_empty() || !page_errors.is_empty() || !branch_errors.is_empty(),
        form_errors,
        page_errors,
        branch_errors,
        sanitized_pages,
    }
}

/// Copy of the pages with text trimmed, type-foreign fields cleared and all
/// numbering re-established.
pub fn sanitize_pages(form: &FormSpec) -> Vec<PageSpec> {
    let mut copy = FormSpec {
        pages: form.pages.clone(),
        ..FormSpec::default()
    };
    for page in &mut copy.pages {
        page.title = page.title.trim().to_string();
        page.description = page.description.trim().to_string();
        for question in &mut page.questions {
            sanitize_question(question);
        }
    }
    copy.renumber();
    copy.pages
}

fn sanitize_question(question: &mut QuestionSpec) {
    question.text = question.text.trim().to_string();
    question.clear_foreign_fields();
    for choice in &mut question.choices {
        choice.text = choice.text.trim().to_string();
    }
    for file_type in &mut question.allowed_file_types {
        *file_type = file_type.trim().to_string();
    }
    question
        .allowed_file_types
        .retain(|file_type| !file_type.is_empty());
}

fn check_page(page_idx: usize, page: &PageSpec, page_count: usize) -> PageErrors {
    let mut errors = PageErrors::default();
    if page.title.is_empty() {
        errors.page.push("page title is required".to_string());
    }
    if page.questions.is_empty() {
        errors.page.push("page needs at least one question".to_string());
    }
    if let Some(next) = page.next_page {
        if next > page_count {
            errors.page.push(format!(
                "next page index {next} is out of range 0..={page_count}"
            ));
        } else if next <= page_idx {
            errors
                .page
                .push("next page must come after this page".to_string());
        }
    }

    for (question_idx, question) in page.questions.iter().enumerate() {
        let mut question_errors = Vec::new();
        if question.text.is_empty() {
            question_errors.push("question text is required".to_string());
        }
        question_errors.extend(check_constraints(question));
        if !question_errors.is_empty() {
            errors.questions.insert(question_idx, question_errors);
        }
    }
    errors
}

fn check_branch(
    page_idx: usize,
    page: &PageSpec,
    branch: &BranchRule,
    page_count: usize,
) -> Vec<String> {
    let mut errors = Vec::new();

    let question = page.question_by_number(branch.question_number);
    if question.is_none() {
        errors.push(format!(
            "question {} is not on page {}",
            branch.question_number,
            page_idx + 1
        ));
    }

    let condition = &branch.condition;
    if condition.is_empty() {
        errors.push("branch trigger value is required".to_string());
    }
    match condition.mode {
        ConditionMode::Include => {
            if condition.values.len() > 1 {
                errors.push("include branch takes a single trigger value".to_string());
            }
        }
        ConditionMode::Exclude => {
            for value in &condition.values {
                if value.contains([',', '[', ']']) {
                    errors.push(format!("value '{value}' cannot contain ',', '[' or ']'"));
                }
            }
            if let Some(question) = question.filter(|question| question.kind == QuestionType::Mcq)
            {
                for value in &condition.values {
                    if !question.choice_texts().any(|choice| choice == value.trim()) {
                        errors.push(format!("'{value}' is not a choice of the question"));
                    }
                }
            }
        }
    }

    if branch.target_page > page_count {
        errors.push(format!(
            "target page index {} is out of range 0..={page_count}",
            branch.target_page
        ));
    } else if branch.target_page <= page_idx {
        errors.push("target page must come after the source page".to_string());
    }
    errors
}
