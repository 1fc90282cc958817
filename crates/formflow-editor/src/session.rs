use std::collections::BTreeSet;

use formflow_spec::{BranchAnchors, FormReport, FormSpec, QuestionSpec, validate};
use tracing::debug;

/// Direction for page, question and choice moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Neighbour index of `index` inside a list of `len` items.
    pub(crate) fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        let target = match self {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index.checked_add(1)?,
        };
        (index < len && target < len).then_some(target)
    }
}

/// One authoring session over a form document.
///
/// Every mutation is total: an operation naming a page, question or choice
/// that does not exist leaves the document untouched and returns `false`
/// (or `None`). The selection set and the clipboard live here so that
/// independent sessions never share them.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub(crate) form: FormSpec,
    pub(crate) selection: BTreeSet<String>,
    pub(crate) clipboard: Vec<QuestionSpec>,
}

impl EditorSession {
    /// Starts an empty form with zero pages.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::from_form(FormSpec::new(id, title))
    }

    pub fn from_form(mut form: FormSpec) -> Self {
        form.renumber();
        Self {
            form,
            selection: BTreeSet::new(),
            clipboard: Vec::new(),
        }
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn into_form(self) -> FormSpec {
        self.form
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    /// Sanitizes and validates the document. Callers must check
    /// `has_errors` before persisting.
    pub fn validate(&self) -> FormReport {
        let report = validate(&self.form);
        debug!(
            form = %self.form.id,
            errors = report.error_count(),
            "validated form"
        );
        report
    }

    /// Runs a question-membership mutation and re-establishes numbering and
    /// branch references afterwards.
    pub(crate) fn restructure<T>(&mut self, edit: impl FnOnce(&mut FormSpec) -> T) -> T {
        let anchors = BranchAnchors::capture(&self.form);
        let out = edit(&mut self.form);
        let dropped = anchors.restore(&mut self.form);
        if !dropped.is_empty() {
            debug!(?dropped, "dropped branch rules whose question left the page");
        }
        self.form.renumber();
        self.prune_selection();
        out
    }

    fn prune_selection(&mut self) {
        let form = &self.form;
        self.selection.retain(|id| form.find_question(id).is_some());
    }

    pub(crate) fn question_mut(
        &mut self,
        page: usize,
        question: usize,
    ) -> Option<&mut QuestionSpec> {
        self.form
            .pages
            .get_mut(page)
            .and_then(|page| page.questions.get_mut(question))
    }
}
