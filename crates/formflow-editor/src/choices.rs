use formflow_spec::{Choice, QuestionSpec, QuestionType};
use tracing::debug;

use crate::session::{Direction, EditorSession};

impl EditorSession {
    fn mcq_mut(&mut self, page: usize, question: usize) -> Option<&mut QuestionSpec> {
        self.question_mut(page, question)
            .filter(|question| question.kind == QuestionType::Mcq)
    }

    /// Appends an empty choice and returns its index.
    pub fn add_choice(&mut self, page: usize, question: usize) -> Option<usize> {
        let Some(target) = self.mcq_mut(page, question) else {
            debug!(page, question, "add_choice: no such multiple choice question");
            return None;
        };
        target.choices.push(Choice::new(""));
        target.renumber_choices();
        Some(target.choices.len() - 1)
    }

    pub fn remove_choice(&mut self, page: usize, question: usize, choice: usize) -> bool {
        let Some(target) = self.mcq_mut(page, question) else {
            return false;
        };
        if choice >= target.choices.len() {
            debug!(page, question, choice, "remove_choice: no such choice");
            return false;
        }
        target.choices.remove(choice);
        target.renumber_choices();
        true
    }

    pub fn move_choice(
        &mut self,
        page: usize,
        question: usize,
        choice: usize,
        direction: Direction,
    ) -> bool {
        let Some(target) = self.mcq_mut(page, question) else {
            return false;
        };
        let Some(other) = direction.neighbour(choice, target.choices.len()) else {
            return false;
        };
        target.choices.swap(choice, other);
        target.renumber_choices();
        true
    }

    pub fn change_choice_text(
        &mut self,
        page: usize,
        question: usize,
        choice: usize,
        text: impl Into<String>,
    ) -> bool {
        match self
            .mcq_mut(page, question)
            .and_then(|target| target.choices.get_mut(choice))
        {
            Some(slot) => {
                slot.text = text.into();
                true
            }
            None => false,
        }
    }
}
