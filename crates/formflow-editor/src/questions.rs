use formflow_spec::{Choice, QuestionSpec, QuestionType};
use tracing::debug;
use uuid::Uuid;

use crate::session::EditorSession;

/// Editable question attribute together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionField {
    Text(String),
    /// Retypes the question; fields foreign to the new type are cleared.
    Kind(QuestionType),
    Mandatory(bool),
    MultiSelect(bool),
    MaxLength(Option<usize>),
    MinDate(Option<String>),
    MaxDate(Option<String>),
    AllowedFileTypes(Vec<String>),
    MaxFileSizeMb(Option<u64>),
    AllowMultiple(bool),
    /// Designates the "Other" choice by index; `None` removes the designation.
    OtherChoice(Option<usize>),
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl EditorSession {
    /// Appends an empty essay question to `page` and returns its id.
    pub fn add_question(&mut self, page: usize) -> Option<String> {
        if page >= self.form.pages.len() {
            debug!(page, "add_question: no such page");
            return None;
        }
        let id = new_id();
        let question = QuestionSpec::new(id.clone(), QuestionType::Essay);
        self.restructure(|form| form.pages[page].questions.push(question));
        debug!(page, question = %id, "added question");
        Some(id)
    }

    pub fn remove_question(&mut self, page: usize, question: usize) -> bool {
        if self.question_mut(page, question).is_none() {
            debug!(page, question, "remove_question: no such question");
            return false;
        }
        let removed = self.restructure(|form| form.pages[page].questions.remove(question));
        debug!(page, question = %removed.id, "removed question");
        true
    }

    pub fn change_question_field(
        &mut self,
        page: usize,
        question: usize,
        field: QuestionField,
    ) -> bool {
        let Some(target) = self.question_mut(page, question) else {
            debug!(page, question, "change_question_field: no such question");
            return false;
        };
        match field {
            QuestionField::Text(text) => target.text = text,
            QuestionField::Kind(kind) => {
                if target.kind != kind {
                    target.kind = kind;
                    target.clear_foreign_fields();
                    if kind == QuestionType::Mcq && target.choices.is_empty() {
                        target.choices.push(Choice::new(""));
                        target.renumber_choices();
                    }
                }
            }
            QuestionField::Mandatory(value) => target.mandatory = value,
            QuestionField::MultiSelect(value) => target.multi_select = value,
            QuestionField::MaxLength(value) => target.max_length = value,
            QuestionField::MinDate(value) => target.min_date = value,
            QuestionField::MaxDate(value) => target.max_date = value,
            QuestionField::AllowedFileTypes(value) => target.allowed_file_types = value,
            QuestionField::MaxFileSizeMb(value) => target.max_file_size_mb = value,
            QuestionField::AllowMultiple(value) => target.allow_multiple = value,
            QuestionField::OtherChoice(index) => {
                if index.is_some_and(|index| index >= target.choices.len()) {
                    return false;
                }
                for (idx, choice) in target.choices.iter_mut().enumerate() {
                    choice.is_other = Some(idx) == index;
                }
            }
        }
        true
    }

    /// Moves a question to `to_index` on `to_page` (clamped to the end of
    /// that page), possibly across pages.
    pub fn drag_question(
        &mut self,
        from_page: usize,
        from_index: usize,
        to_page: usize,
        to_index: usize,
    ) -> bool {
        if self.question_mut(from_page, from_index).is_none() || to_page >= self.form.pages.len() {
            debug!(from_page, from_index, to_page, "drag_question: invalid source or target");
            return false;
        }
        self.restructure(|form| {
            let question = form.pages[from_page].questions.remove(from_index);
            let questions = &mut form.pages[to_page].questions;
            let index = to_index.min(questions.len());
            questions.insert(index, question);
        });
        debug!(from_page, from_index, to_page, to_index, "dragged question");
        true
    }
}
