//! Per-question answer validators.
//!
//! Every validator is a pure function of the question's declared constraints
//! and the candidate answer. They are shared by the editor (constraint sanity
//! at save time) and the navigator (gating `advance`).

use time::Date;
use time::macros::format_description;

use crate::answers::{Answer, AnswerCheck};
use crate::spec::question::{QuestionSpec, QuestionType};

pub const REQUIRED_MESSAGE: &str = "This question is required";

/// Dispatches to the validator matching the question type.
pub fn validate_answer(question: &QuestionSpec, answer: Option<&Answer>) -> AnswerCheck {
    match question.kind {
        QuestionType::Essay => validate_essay(question, answer),
        QuestionType::Mcq => validate_mcq(question, answer),
        QuestionType::Date => validate_date(question, answer),
        QuestionType::Number => validate_number(question, answer),
        QuestionType::Upload => validate_upload(question, answer),
        QuestionType::Unrecognized => {
            let mut check = AnswerCheck::pass();
            check.push("unsupported_type", "This question type is not supported");
            check
        }
    }
}

pub fn validate_essay(question: &QuestionSpec, answer: Option<&Answer>) -> AnswerCheck {
    let mut check = AnswerCheck::pass();
    let Some(answer) = present(answer) else {
        return required_or_pass(question, check);
    };
    let Answer::Text(text) = answer else {
        check.push("type_mismatch", "Expected a text answer");
        return check;
    };
    if let Some(max_length) = question.max_length {
        let length = text.chars().count();
        if length > max_length {
            check.push(
                "max_length",
                format!("Answer must be at most {max_length} characters (got {length})"),
            );
        }
    }
    check
}

pub fn validate_mcq(question: &QuestionSpec, answer: Option<&Answer>) -> AnswerCheck {
    let mut check = AnswerCheck::pass();
    let Some(answer) = present(answer) else {
        return required_or_pass(question, check);
    };
    let selected: Vec<&str> = match (answer, question.multi_select) {
        (Answer::Text(text), false) => vec![text.as_str()],
        (Answer::List(items), true) => items.iter().map(String::as_str).collect(),
        (_, true) => {
            check.push("type_mismatch", "Expected a list of selected options");
            return check;
        }
        (_, false) => {
            check.push("type_mismatch", "Expected a single selected option");
            return check;
        }
    };

    let has_other = question.other_choice().is_some();
    let mut other_count = 0;
    for value in selected {
        if let Some(free_text) = Answer::split_other(value)
            && has_other
        {
            other_count += 1;
            if free_text.trim().is_empty() {
                check.push("other_empty", "Please describe your \"Other\" answer");
            }
            continue;
        }
        if !question.choice_texts().any(|choice| choice == value) {
            check.push("invalid_choice", format!("\"{value}\" is not one of the options"));
        }
    }
    if other_count > 1 {
        check.push("other_repeated", "Only one \"Other\" answer may be given");
    }
    check
}

pub fn validate_date(question: &QuestionSpec, answer: Option<&Answer>) -> AnswerCheck {
    let mut check = AnswerCheck::pass();
    let Some(answer) = present(answer) else {
        return required_or_pass(question, check);
    };
    let Answer::Text(raw) = answer else {
        check.push("type_mismatch", "Expected a date");
        return check;
    };
    let Some(date) = parse_date(raw) else {
        check.push("invalid_date", "Please enter a valid date (YYYY-MM-DD)");
        return check;
    };
    if let Some(min) = question.min_date.as_deref().and_then(parse_date)
        && date < min
    {
        check.push(
            "min_date",
            format!("Date must be on or after {}", format_date(min)),
        );
    }
    if let Some(max) = question.max_date.as_deref().and_then(parse_date)
        && date > max
    {
        check.push(
            "max_date",
            format!("Date must be on or before {}", format_date(max)),
        );
    }
    check
}

pub fn validate_number(question: &QuestionSpec, answer: Option<&Answer>) -> AnswerCheck {
    let mut check = AnswerCheck::pass();
    let Some(answer) = present(answer) else {
        return required_or_pass(question, check);
    };
    let parsed = match answer {
        Answer::Number(value) => Some(*value),
        Answer::Text(raw) => parse_number(raw),
        Answer::List(_) => None,
    };
    if !parsed.is_some_and(f64::is_finite) {
        check.push("not_a_number", "Please enter a valid number");
    }
    check
}

pub fn validate_upload(question: &QuestionSpec, answer: Option<&Answer>) -> AnswerCheck {
    let mut check = AnswerCheck::pass();
    let Some(answer) = present(answer) else {
        if question.mandatory {
            check.push("required", "Please upload at least one file");
        }
        return check;
    };
    let files: Vec<&str> = match answer {
        Answer::List(items) => items.iter().map(String::as_str).collect(),
        Answer::Text(name) => vec![name.as_str()],
        Answer::Number(_) => {
            check.push("type_mismatch", "Expected uploaded file references");
            return check;
        }
    };
    if !question.allow_multiple && files.len() != 1 {
        check.push("single_file", "Only one file may be uploaded");
    }
    for file in files {
        if !file_type_allowed(question, file) {
            check.push(
                "file_type",
                format!(
                    "\"{file}\" is not an allowed file type ({})",
                    question.allowed_file_types.join(", ")
                ),
            );
        }
    }
    check
}

/// Save-time sanity of a question's declared constraints.
pub fn check_constraints(question: &QuestionSpec) -> Vec<String> {
    let mut errors = Vec::new();
    match question.kind {
        QuestionType::Essay => {
            if question.max_length == Some(0) {
                errors.push("maximum length must be greater than zero".to_string());
            }
        }
        QuestionType::Mcq => {
            if question.choices.is_empty() {
                errors.push("multiple choice question needs at least one choice".to_string());
            }
            for choice in &question.choices {
                if choice.text.trim().is_empty() {
                    errors.push(format!("choice {} has no text", choice.choice_number));
                }
            }
            let mut texts: Vec<&str> = question
                .choices
                .iter()
                .map(|choice| choice.text.trim())
                .filter(|text| !text.is_empty())
                .collect();
            texts.sort_unstable();
            if texts.windows(2).any(|pair| pair[0] == pair[1]) {
                errors.push("choice texts must be unique".to_string());
            }
            if question.choices.iter().filter(|choice| choice.is_other).count() > 1 {
                errors.push("only one choice may be marked as \"Other\"".to_string());
            }
        }
        QuestionType::Date => {
            let min = date_bound(question.min_date.as_deref(), "minimum", &mut errors);
            let max = date_bound(question.max_date.as_deref(), "maximum", &mut errors);
            if let (Some(min), Some(max)) = (min, max)
                && min > max
            {
                errors.push("minimum date is after maximum date".to_string());
            }
        }
        QuestionType::Number => {}
        QuestionType::Upload => {
            if question.max_file_size_mb == Some(0) {
                errors.push("maximum file size must be greater than zero".to_string());
            }
        }
        QuestionType::Unrecognized => {
            errors.push("unrecognized question type".to_string());
        }
    }
    errors
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Case-insensitive extension check against `allowed_file_types`; an empty
/// list allows everything.
pub fn file_type_allowed(question: &QuestionSpec, file_name: &str) -> bool {
    if question.allowed_file_types.is_empty() {
        return true;
    }
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return false;
    };
    question.allowed_file_types.iter().any(|allowed| {
        allowed
            .trim_start_matches('.')
            .eq_ignore_ascii_case(extension)
    })
}

fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

fn date_bound(raw: Option<&str>, label: &str, errors: &mut Vec<String>) -> Option<Date> {
    let raw = raw?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.push(format!("{label} date '{raw}' is not a valid YYYY-MM-DD date"));
    }
    parsed
}

fn present(answer: Option<&Answer>) -> Option<&Answer> {
    answer.filter(|answer| !answer.is_empty())
}

fn required_or_pass(question: &QuestionSpec, mut check: AnswerCheck) -> AnswerCheck {
    if question.mandatory {
        check.push("required", REQUIRED_MESSAGE);
    }
    check
}
