use std::collections::BTreeMap;
use std::fmt;

use formflow_spec::{Answer, AnswerCheck, FormSpec, QuestionSpec, QuestionType, validate_answer};

/// Raw input delivered to a question control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlInput {
    /// Typed text for Essay, Date and Number questions.
    Text(String),
    Number(f64),
    /// Selected choice texts of an MCQ question.
    Select(Vec<String>),
    /// Free text of the "Other" choice; also selects that choice.
    OtherText(String),
    /// Stored file references of an Upload question.
    Files(Vec<String>),
}

/// Capability object registered per question id.
///
/// Controls hold transient input. Nothing reaches the navigator's answer map
/// until `collect` is called on advance.
pub trait QuestionControl: fmt::Debug + Send {
    fn question_id(&self) -> &str;

    /// Feeds raw input. Returns `false` when the input does not fit the
    /// question type.
    fn apply(&mut self, input: ControlInput) -> bool;

    /// Current input as an answer; `None` when nothing was entered.
    fn collect(&self) -> Option<Answer>;

    fn validate(&self) -> AnswerCheck;

    /// Drops transient input.
    fn clear(&mut self);

    /// Repopulates the control from a stored answer.
    fn reassign(&mut self, answer: Option<&Answer>);
}

/// Default control backing all five question types.
#[derive(Debug, Clone)]
pub struct InputControl {
    question: QuestionSpec,
    text: String,
    selected: Vec<String>,
    other_text: String,
    files: Vec<String>,
}

impl InputControl {
    pub fn new(question: QuestionSpec) -> Self {
        Self {
            question,
            text: String::new(),
            selected: Vec::new(),
            other_text: String::new(),
            files: Vec::new(),
        }
    }

    pub fn question(&self) -> &QuestionSpec {
        &self.question
    }

    /// Free text currently held by the "Other" input.
    pub fn other_text(&self) -> &str {
        &self.other_text
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    fn other_label(&self) -> Option<&str> {
        self.question
            .other_choice()
            .map(|choice| choice.text.as_str())
    }

    fn select_other(&mut self) {
        let Some(label) = self.other_label().map(str::to_string) else {
            return;
        };
        if self.question.multi_select {
            if !self.selected.contains(&label) {
                self.selected.push(label);
            }
        } else {
            self.selected = vec![label];
        }
    }

    fn collect_choices(&self) -> Option<Answer> {
        let other = self.other_label();
        let mut values: Vec<String> = self
            .selected
            .iter()
            .map(|value| match other {
                Some(label) if label == value.as_str() => Answer::other(&self.other_text),
                _ => value.clone(),
            })
            .collect();
        if values.is_empty() {
            return None;
        }
        if self.question.multi_select {
            Some(Answer::List(values))
        } else {
            Some(Answer::Text(values.swap_remove(0)))
        }
    }

    fn reassign_choices(&mut self, items: Vec<String>) {
        let other = self.other_label().map(str::to_string);
        for item in items {
            let is_choice = self.question.choice_texts().any(|choice| choice == item);
            let free = Answer::split_other(&item)
                .filter(|_| !is_choice)
                .map(str::to_string);
            match (&other, free) {
                (Some(label), Some(free)) => {
                    self.other_text = free;
                    self.selected.push(label.clone());
                }
                _ => self.selected.push(item),
            }
        }
    }
}

impl QuestionControl for InputControl {
    fn question_id(&self) -> &str {
        &self.question.id
    }

    fn apply(&mut self, input: ControlInput) -> bool {
        match (self.question.kind, input) {
            (
                QuestionType::Essay | QuestionType::Date | QuestionType::Number,
                ControlInput::Text(text),
            ) => self.text = text,
            (QuestionType::Number, ControlInput::Number(value)) => self.text = value.to_string(),
            (QuestionType::Mcq, ControlInput::Select(choices)) => {
                if !self.question.multi_select && choices.len() > 1 {
                    return false;
                }
                self.selected = choices;
            }
            (QuestionType::Mcq, ControlInput::OtherText(text)) => {
                if self.other_label().is_none() {
                    return false;
                }
                self.other_text = text;
                self.select_other();
            }
            (QuestionType::Upload, ControlInput::Files(files)) => self.files = files,
            _ => return false,
        }
        true
    }

    fn collect(&self) -> Option<Answer> {
        match self.question.kind {
            QuestionType::Mcq => self.collect_choices(),
            QuestionType::Upload => {
                (!self.files.is_empty()).then(|| Answer::List(self.files.clone()))
            }
            QuestionType::Number => {
                let raw = self.text.trim();
                if raw.is_empty() {
                    return None;
                }
                Some(match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => Answer::Number(value),
                    _ => Answer::Text(raw.to_string()),
                })
            }
            QuestionType::Essay | QuestionType::Date | QuestionType::Unrecognized => {
                (!self.text.trim().is_empty()).then(|| Answer::Text(self.text.clone()))
            }
        }
    }

    fn validate(&self) -> AnswerCheck {
        validate_answer(&self.question, self.collect().as_ref())
    }

    fn clear(&mut self) {
        self.text.clear();
        self.selected.clear();
        self.other_text.clear();
        self.files.clear();
    }

    fn reassign(&mut self, answer: Option<&Answer>) {
        self.clear();
        let Some(answer) = answer else {
            return;
        };
        match self.question.kind {
            QuestionType::Mcq => self.reassign_choices(answer.items()),
            QuestionType::Upload => self.files = answer.items(),
            _ => self.text = answer.to_submission_string(),
        }
    }
}

/// Controls of one fill-out, keyed by question id.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: BTreeMap<String, Box<dyn QuestionControl>>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an [`InputControl`] for every question of the form.
    pub fn for_form(form: &FormSpec) -> Self {
        let mut registry = Self::new();
        for question in form.questions() {
            registry.register(Box::new(InputControl::new(question.clone())));
        }
        registry
    }

    /// Registers `control` under its question id, returning the control it
    /// replaced.
    pub fn register(
        &mut self,
        control: Box<dyn QuestionControl>,
    ) -> Option<Box<dyn QuestionControl>> {
        self.controls.insert(control.question_id().to_string(), control)
    }

    pub fn get(&self, question_id: &str) -> Option<&dyn QuestionControl> {
        self.controls
            .get(question_id)
            .map(|control| control.as_ref())
    }

    pub fn get_mut(&mut self, question_id: &str) -> Option<&mut (dyn QuestionControl + 'static)> {
        self.controls
            .get_mut(question_id)
            .map(|control| control.as_mut())
    }

    pub fn clear_all(&mut self) {
        for control in self.controls.values_mut() {
            control.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use formflow_spec::Choice;

    use super::*;

    fn mcq(multi_select: bool) -> InputControl {
        let mut question =
            QuestionSpec::new("size", QuestionType::Mcq).with_choices(["Small", "Large"]);
        let mut other = Choice::new("Other");
        other.is_other = true;
        question.choices.push(other);
        question.multi_select = multi_select;
        question.renumber_choices();
        InputControl::new(question)
    }

    #[test]
    fn other_text_round_trips_through_reassign() {
        let mut control = mcq(false);
        assert!(control.apply(ControlInput::OtherText("Medium".into())));
        let answer = control.collect().expect("answered");
        assert_eq!(answer, Answer::from("Other: Medium"));

        let mut fresh = mcq(false);
        fresh.reassign(Some(&answer));
        assert_eq!(fresh.other_text(), "Medium");
        assert_eq!(fresh.selected(), ["Other".to_string()]);
        assert_eq!(fresh.collect(), Some(answer));
    }

    #[test]
    fn multi_select_mixes_choices_and_other() {
        let mut control = mcq(true);
        control.apply(ControlInput::Select(vec!["Small".into()]));
        control.apply(ControlInput::OtherText("Tall".into()));
        let answer = control.collect().expect("answered");
        assert_eq!(
            answer,
            Answer::List(vec!["Small".into(), "Other: Tall".into()])
        );
        assert!(control.validate().valid);
    }

    #[test]
    fn number_input_is_parsed_or_left_for_the_validator() {
        let mut control =
            InputControl::new(QuestionSpec::new("age", QuestionType::Number).mandatory());
        assert!(control.validate().has_code("required"));

        control.apply(ControlInput::Text("forty".into()));
        assert_eq!(control.collect(), Some(Answer::from("forty")));
        assert!(control.validate().has_code("not_a_number"));

        control.apply(ControlInput::Text(" 42 ".into()));
        assert_eq!(control.collect(), Some(Answer::Number(42.0)));
        assert!(control.validate().valid);
    }

    #[test]
    fn non_finite_numbers_are_not_numbers() {
        let mut control = InputControl::new(QuestionSpec::new("age", QuestionType::Number));
        for raw in ["NaN", "inf", "-infinity"] {
            control.apply(ControlInput::Text(raw.into()));
            assert_eq!(control.collect(), Some(Answer::from(raw)));
            assert!(control.validate().has_code("not_a_number"), "{raw}");
        }

        control.apply(ControlInput::Number(f64::INFINITY));
        assert_eq!(control.collect(), Some(Answer::from("inf")));
        assert!(control.validate().has_code("not_a_number"));
    }

    #[test]
    fn mismatched_input_is_rejected() {
        let mut control = InputControl::new(QuestionSpec::new("q", QuestionType::Essay));
        assert!(!control.apply(ControlInput::Files(vec!["a.pdf".into()])));
        assert!(!control.apply(ControlInput::OtherText("x".into())));
        assert_eq!(control.collect(), None);

        let mut plain = InputControl::new(
            QuestionSpec::new("plain", QuestionType::Mcq).with_choices(["A", "B"]),
        );
        assert!(!plain.apply(ControlInput::OtherText("x".into())), "no Other choice");
    }

    #[test]
    fn single_select_takes_one_choice() {
        let mut control = mcq(false);
        assert!(!control.apply(ControlInput::Select(vec!["Small".into(), "Large".into()])));
        assert_eq!(control.collect(), None);

        assert!(control.apply(ControlInput::Select(vec!["Large".into()])));
        assert!(!control.apply(ControlInput::Select(vec!["Small".into(), "Large".into()])));
        assert_eq!(control.collect(), Some(Answer::from("Large")));

        let mut multi = mcq(true);
        assert!(multi.apply(ControlInput::Select(vec!["Small".into(), "Large".into()])));
    }

    #[test]
    fn clear_drops_transient_input() {
        let mut control = mcq(false);
        control.apply(ControlInput::Select(vec!["Large".into()]));
        control.clear();
        assert_eq!(control.collect(), None);
    }
}
