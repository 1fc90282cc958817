use std::collections::BTreeSet;

use formflow_spec::QuestionSpec;
use tracing::debug;

use crate::questions::new_id;
use crate::session::EditorSession;

impl EditorSession {
    /// Adds a question to the multi-select set. Unknown ids are ignored.
    pub fn select(&mut self, question_id: &str) -> bool {
        if self.form.find_question(question_id).is_none() {
            return false;
        }
        self.selection.insert(question_id.to_string())
    }

    pub fn deselect(&mut self, question_id: &str) -> bool {
        self.selection.remove(question_id)
    }

    pub fn toggle_selection(&mut self, question_id: &str) -> bool {
        if self.selection.contains(question_id) {
            self.deselect(question_id);
            false
        } else {
            self.select(question_id)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn clipboard(&self) -> &[QuestionSpec] {
        &self.clipboard
    }

    /// Snapshots the selected questions, in document order, into the
    /// clipboard. The document is not touched. Returns the number copied.
    pub fn copy_selection(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        self.clipboard = self
            .form
            .questions()
            .filter(|question| self.selection.contains(&question.id))
            .cloned()
            .collect();
        debug!(count = self.clipboard.len(), "copied selection");
        self.clipboard.len()
    }

    /// Copies the selection, then removes the selected questions from their
    /// pages. Returns the number of questions cut.
    pub fn cut_selection(&mut self) -> usize {
        let count = self.copy_selection();
        if count == 0 {
            return 0;
        }
        let selected = std::mem::take(&mut self.selection);
        self.restructure(|form| {
            for page in &mut form.pages {
                page.questions.retain(|question| !selected.contains(&question.id));
            }
        });
        debug!(count, "cut selection");
        count
    }

    /// Appends fresh-identity clones of the clipboard to `target_page` and
    /// returns the new ids. The clipboard is kept for further pastes.
    pub fn paste_selection(&mut self, target_page: usize) -> Vec<String> {
        if target_page >= self.form.pages.len() || self.clipboard.is_empty() {
            debug!(target_page, "paste_selection: nothing to paste");
            return Vec::new();
        }
        let clones: Vec<QuestionSpec> = self
            .clipboard
            .iter()
            .map(|question| QuestionSpec {
                id: new_id(),
                ..question.clone()
            })
            .collect();
        let ids = clones.iter().map(|question| question.id.clone()).collect();
        self.restructure(|form| form.pages[target_page].questions.extend(clones));
        debug!(target_page, "pasted clipboard");
        ids
    }
}
