use std::collections::BTreeMap;

use formflow_spec::{
    Answer, AnswerCheck, AnswerMap, FormSpec, PageSpec, Submission, SubmissionService,
    SubmittedAnswer, TransportError, validate_answer,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::branch::resolve_next_page;
use crate::control::{ControlInput, ControlRegistry};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("the questionnaire has not reached its submission page")]
    NotComplete,
    #[error("submission failed: {0}")]
    Transport(#[from] TransportError),
}

/// Outcome of [`Navigator::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the page at this index.
    Moved(usize),
    /// The current page failed validation; checks are keyed by question id.
    Blocked(BTreeMap<String, AnswerCheck>),
    /// Reached the submission state.
    Completed,
}

/// One respondent's walk through a form.
#[derive(Debug)]
pub struct Navigator {
    form: FormSpec,
    current: usize,
    history: Vec<usize>,
    answers: AnswerMap,
    controls: ControlRegistry,
}

impl Navigator {
    /// Starts on the first page with an [`crate::InputControl`] registered for
    /// every question.
    pub fn new(form: FormSpec) -> Self {
        let controls = ControlRegistry::for_form(&form);
        Self {
            form,
            current: 0,
            history: vec![0],
            answers: AnswerMap::new(),
            controls,
        }
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn current_page_index(&self) -> usize {
        self.current
    }

    /// Page being displayed; `None` in the submission state.
    pub fn current_page(&self) -> Option<&PageSpec> {
        self.form.pages.get(self.current)
    }

    /// Indices of the pages visited so far, oldest first.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlRegistry {
        &mut self.controls
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.form.page_count()
    }

    fn on_current_page(&self, question_id: &str) -> bool {
        self.current_page()
            .is_some_and(|page| page.position_of(question_id).is_some())
    }

    /// Feeds raw input to a control on the displayed page.
    pub fn apply(&mut self, question_id: &str, input: ControlInput) -> bool {
        if !self.on_current_page(question_id) {
            debug!(question = %question_id, "apply: question not on the current page");
            return false;
        }
        self.controls
            .get_mut(question_id)
            .is_some_and(|control| control.apply(input))
    }

    /// Loads a ready-made answer into a control on the displayed page.
    pub fn enter(&mut self, question_id: &str, answer: &Answer) -> bool {
        if !self.on_current_page(question_id) {
            debug!(question = %question_id, "enter: question not on the current page");
            return false;
        }
        let Some(control) = self.controls.get_mut(question_id) else {
            return false;
        };
        control.reassign(Some(answer));
        true
    }

    /// Validates one control's current input without advancing.
    pub fn check(&self, question_id: &str) -> Option<AnswerCheck> {
        if let Some(control) = self.controls.get(question_id) {
            return Some(control.validate());
        }
        self.form
            .question(question_id)
            .map(|question| validate_answer(question, self.answers.get(question_id)))
    }

    /// Validates the displayed page, stores its answers and moves to the
    /// resolved next page. A failing page leaves the answers and history
    /// untouched.
    pub fn advance(&mut self) -> Advance {
        let Some(page) = self.form.pages.get(self.current) else {
            return Advance::Completed;
        };

        let mut failures = BTreeMap::new();
        for question in &page.questions {
            let check = match self.controls.get(&question.id) {
                Some(control) => control.validate(),
                None => validate_answer(question, self.answers.get(&question.id)),
            };
            if !check.valid {
                failures.insert(question.id.clone(), check);
            }
        }
        if !failures.is_empty() {
            debug!(page = self.current, failed = failures.len(), "advance blocked");
            return Advance::Blocked(failures);
        }

        for question in &page.questions {
            let Some(control) = self.controls.get(&question.id) else {
                continue;
            };
            match control.collect() {
                Some(answer) => {
                    self.answers.insert(question.id.clone(), answer);
                }
                None => {
                    self.answers.remove(&question.id);
                }
            }
        }

        let from = self.current;
        let target = resolve_next_page(&self.form, from, &self.answers);
        self.history.push(target);
        self.current = target;

        if self.is_complete() {
            info!(form = %self.form.id, from, "reached submission");
            return Advance::Completed;
        }
        info!(form = %self.form.id, from, to = target, "advanced");
        self.reassign();
        Advance::Moved(target)
    }

    /// Returns to the previously visited page. The first page has no
    /// predecessor.
    pub fn back(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        let Some(&previous) = self.history.last() else {
            return false;
        };
        info!(form = %self.form.id, from = self.current, to = previous, "went back");
        self.current = previous;
        self.reassign();
        true
    }

    /// Resets the displayed page's controls. Stored answers are kept.
    pub fn clear(&mut self) {
        let Some(page) = self.form.pages.get(self.current) else {
            return;
        };
        for question in &page.questions {
            if let Some(control) = self.controls.get_mut(&question.id) {
                control.clear();
            }
        }
    }

    /// Repopulates the displayed page's controls from the stored answers.
    pub fn reassign(&mut self) {
        let Some(page) = self.form.pages.get(self.current) else {
            return;
        };
        for question in &page.questions {
            if let Some(control) = self.controls.get_mut(&question.id) {
                control.reassign(self.answers.get(&question.id));
            }
        }
    }

    /// Stored answers in global question order, stringified.
    pub fn submission(&self) -> Submission {
        let answers = self
            .form
            .questions()
            .filter_map(|question| {
                self.answers.get(&question.id).map(|answer| SubmittedAnswer {
                    question_id: question.id.clone(),
                    question_number: question.question_number,
                    value: answer.to_submission_string(),
                })
            })
            .collect();
        Submission {
            form_id: self.form.id.clone(),
            answers,
        }
    }

    /// Hands the answers to `service`. Answers are cleared only once the
    /// service accepted them. Returns the service's receipt.
    pub async fn submit<S>(&mut self, service: &S) -> Result<String, SubmitError>
    where
        S: SubmissionService + ?Sized,
    {
        if !self.is_complete() {
            return Err(SubmitError::NotComplete);
        }
        let submission = self.submission();
        let receipt = service
            .submit(&submission)
            .await
            .inspect_err(|err| warn!(form = %self.form.id, %err, "submission failed"))?;

        info!(form = %self.form.id, %receipt, answers = submission.answers.len(), "submitted");
        self.answers.clear();
        self.controls.clear_all();
        Ok(receipt)
    }
}
