use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::branch::BranchRule;
use crate::spec::question::QuestionSpec;

/// Ordered container of questions with optional branch rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PageSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
    /// Explicit linear fallback; `None` means the page right after this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<BranchRule>,
}

impl PageSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_question(mut self, question: QuestionSpec) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_branch(mut self, branch: BranchRule) -> Self {
        self.branches.push(branch);
        self
    }

    /// Linear successor of the page sitting at `index`.
    pub fn linear_next(&self, index: usize) -> usize {
        self.next_page.unwrap_or(index + 1)
    }

    /// Resolves a page-local, 1-based question number.
    pub fn question_by_number(&self, number: usize) -> Option<&QuestionSpec> {
        number
            .checked_sub(1)
            .and_then(|idx| self.questions.get(idx))
    }

    pub fn position_of(&self, question_id: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|question| question.id == question_id)
    }
}

/// Top-level questionnaire document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct FormSpec {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

impl FormSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.pages.push(page);
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index one past the last page; reaching it means "go to submission".
    pub fn submission_index(&self) -> usize {
        self.pages.len()
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.pages.iter().flat_map(|page| page.questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.pages.iter().map(|page| page.questions.len()).sum()
    }

    pub fn find_question(&self, question_id: &str) -> Option<(usize, usize)> {
        self.pages.iter().enumerate().find_map(|(page_idx, page)| {
            page.position_of(question_id)
                .map(|question_idx| (page_idx, question_idx))
        })
    }

    pub fn question(&self, question_id: &str) -> Option<&QuestionSpec> {
        self.find_question(question_id)
            .map(|(page, idx)| &self.pages[page].questions[idx])
    }

    pub fn branch(&self, branch_id: &str) -> Option<&BranchRule> {
        self.pages
            .iter()
            .flat_map(|page| page.branches.iter())
            .find(|branch| branch.id == branch_id)
    }

    /// Full renumbering pass: global question numbers, choice numbers and
    /// branch `source_page` indices.
    pub fn renumber(&mut self) {
        let mut counter = 0;
        for (page_idx, page) in self.pages.iter_mut().enumerate() {
            for question in &mut page.questions {
                counter += 1;
                question.question_number = counter;
                question.renumber_choices();
            }
            for branch in &mut page.branches {
                branch.source_page = page_idx;
            }
        }
    }

    /// True when question numbers form the dense sequence 1..N in document order.
    pub fn numbering_is_dense(&self) -> bool {
        self.questions()
            .enumerate()
            .all(|(idx, question)| question.question_number == idx + 1)
    }

    pub fn choices_are_dense(&self) -> bool {
        self.questions().all(|question| {
            question
                .choices
                .iter()
                .enumerate()
                .all(|(idx, choice)| choice.choice_number == idx + 1)
        })
    }
}
