use formflow_spec::{BranchCondition, BranchRule, QuestionType};
use tracing::debug;

use crate::questions::new_id;
use crate::session::EditorSession;

/// Edit applied to an existing branch rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchEdit {
    /// Page-local, 1-based number of the keyed question.
    Question(usize),
    Target(usize),
    /// Jump when the answer equals this value.
    Include(String),
    /// Jump when the answer is one of these; stored as the exclude set of the
    /// remaining answers (choice texts for MCQ, the question text otherwise).
    TriggerOn(Vec<String>),
}

impl EditorSession {
    /// Adds a blank rule on `page` keyed on its first question and pointing
    /// at the next page. Returns the rule id, or `None` when the page has no
    /// question to key on.
    pub fn add_branch(&mut self, page: usize) -> Option<String> {
        let Some(questions) = self.form.pages.get(page).map(|page| page.questions.len()) else {
            debug!(page, "add_branch: no such page");
            return None;
        };
        if questions == 0 {
            debug!(page, "add_branch: page has no questions");
            return None;
        }
        let id = new_id();
        self.form.pages[page].branches.push(BranchRule {
            id: id.clone(),
            source_page: page,
            question_number: 1,
            condition: BranchCondition::include(""),
            target_page: page + 1,
        });
        debug!(page, branch = %id, "added branch");
        Some(id)
    }

    pub fn remove_branch(&mut self, branch_id: &str) -> bool {
        for page in &mut self.form.pages {
            if let Some(pos) = page.branches.iter().position(|branch| branch.id == branch_id) {
                page.branches.remove(pos);
                debug!(branch = %branch_id, "removed branch");
                return true;
            }
        }
        false
    }

    /// Applies `edit` to the rule. Question numbers outside the owning page
    /// and targets past the submission sentinel are rejected.
    pub fn edit_branch(&mut self, branch_id: &str, edit: BranchEdit) -> bool {
        let page_count = self.form.pages.len();
        let Some(page) = self
            .form
            .pages
            .iter_mut()
            .find(|page| page.branches.iter().any(|branch| branch.id == branch_id))
        else {
            debug!(branch = %branch_id, "edit_branch: no such branch");
            return false;
        };
        let universe: Option<Vec<String>> = page
            .branches
            .iter()
            .find(|branch| branch.id == branch_id)
            .and_then(|branch| page.question_by_number(branch.question_number))
            .map(|question| match question.kind {
                QuestionType::Mcq => question.choice_texts().map(str::to_string).collect(),
                _ => vec![question.text.clone()],
            });
        let question_count = page.questions.len();
        let Some(branch) = page.branches.iter_mut().find(|branch| branch.id == branch_id) else {
            return false;
        };

        match edit {
            BranchEdit::Question(number) => {
                if !(1..=question_count).contains(&number) {
                    debug!(branch = %branch_id, number, "edit_branch: question not on page");
                    return false;
                }
                branch.question_number = number;
            }
            BranchEdit::Target(target) => {
                if target > page_count {
                    debug!(branch = %branch_id, target, "edit_branch: target out of range");
                    return false;
                }
                branch.target_page = target;
            }
            BranchEdit::Include(value) => branch.condition = BranchCondition::include(value),
            BranchEdit::TriggerOn(chosen) => {
                let Some(universe) = universe else {
                    debug!(branch = %branch_id, "edit_branch: keyed question not on page");
                    return false;
                };
                branch.condition =
                    BranchCondition::trigger_on(universe.iter().map(String::as_str), &chosen);
            }
        }
        true
    }
}
