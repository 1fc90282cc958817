use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported question data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum QuestionType {
    Essay,
    #[serde(rename = "MCQ")]
    Mcq,
    Date,
    Number,
    Upload,
    /// Any type name this crate does not know; rejected by `validate`.
    #[serde(other)]
    Unrecognized,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Essay => "Essay",
            QuestionType::Mcq => "MCQ",
            QuestionType::Date => "Date",
            QuestionType::Number => "Number",
            QuestionType::Upload => "Upload",
            QuestionType::Unrecognized => "Unrecognized",
        }
    }
}

/// Single selectable option of an MCQ question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    pub text: String,
    pub choice_number: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_other: bool,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choice_number: 0,
            is_other: false,
        }
    }
}

/// Definition of a single question inside a page.
///
/// Type-specific fields are kept flat; the ones that do not apply to `kind`
/// are cleared when the document is sanitized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    pub id: String,
    pub question_number: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub multi_select: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_file_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size_mb: Option<u64>,
    #[serde(default)]
    pub allow_multiple: bool,
}

impl QuestionSpec {
    /// Creates an empty question of the given type. Numbering is assigned by
    /// the owning form.
    pub fn new(id: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            question_number: 0,
            text: String::new(),
            kind,
            mandatory: false,
            choices: Vec::new(),
            multi_select: false,
            max_length: None,
            min_date: None,
            max_date: None,
            allowed_file_types: Vec::new(),
            max_file_size_mb: None,
            allow_multiple: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Choice::new).collect();
        self.renumber_choices();
        self
    }

    /// Reassigns `choice_number` densely from 1.
    pub fn renumber_choices(&mut self) {
        for (idx, choice) in self.choices.iter_mut().enumerate() {
            choice.choice_number = idx + 1;
        }
    }

    pub fn other_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.is_other)
    }

    /// Texts of the regular (non-"Other") choices.
    pub fn choice_texts(&self) -> impl Iterator<Item = &str> {
        self.choices
            .iter()
            .filter(|choice| !choice.is_other)
            .map(|choice| choice.text.as_str())
    }

    /// Drops every field that does not apply to the current type.
    pub fn clear_foreign_fields(&mut self) {
        if self.kind != QuestionType::Mcq {
            self.choices.clear();
            self.multi_select = false;
        }
        if self.kind != QuestionType::Essay {
            self.max_length = None;
        }
        if self.kind != QuestionType::Date {
            self.min_date = None;
            self.max_date = None;
        }
        if self.kind != QuestionType::Upload {
            self.allowed_file_types.clear();
            self.max_file_size_mb = None;
            self.allow_multiple = false;
        }
    }
}
