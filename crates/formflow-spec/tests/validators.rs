use formflow_spec::validators::{
    check_constraints, validate_date, validate_essay, validate_mcq, validate_number,
    validate_upload,
};
use formflow_spec::{Answer, Choice, QuestionSpec, QuestionType, validate_answer};

fn essay(max_length: Option<usize>) -> QuestionSpec {
    let mut question = QuestionSpec::new("essay", QuestionType::Essay)
        .with_text("Tell us more")
        .mandatory();
    question.max_length = max_length;
    question
}

fn mcq_with_other(multi_select: bool) -> QuestionSpec {
    let mut question = QuestionSpec::new("mcq", QuestionType::Mcq)
        .with_text("Pick one")
        .with_choices(["Yes", "No"]);
    let mut other = Choice::new("Other");
    other.is_other = true;
    question.choices.push(other);
    question.renumber_choices();
    question.multi_select = multi_select;
    question
}

#[test]
fn essay_enforces_mandatory_and_max_length() {
    let question = essay(Some(5));

    let missing = validate_essay(&question, None);
    assert!(!missing.valid);
    assert!(missing.has_code("required"));
    assert_eq!(missing.messages(), vec!["This question is required"]);

    let blank = validate_essay(&question, Some(&Answer::from("   ")));
    assert!(blank.has_code("required"));

    let too_long = validate_essay(&question, Some(&Answer::from("abcdefg")));
    assert!(too_long.has_code("max_length"));

    assert!(validate_essay(&question, Some(&Answer::from("abc"))).valid);
}

#[test]
fn optional_questions_pass_when_unanswered() {
    let mut question = essay(None);
    question.mandatory = false;
    assert!(validate_answer(&question, None).valid);
}

#[test]
fn mcq_single_select_accepts_known_choice_and_tagged_other() {
    let question = mcq_with_other(false);

    assert!(validate_mcq(&question, Some(&Answer::from("Yes"))).valid);
    assert!(validate_mcq(&question, Some(&Answer::from("Other: a blue one"))).valid);

    let unknown = validate_mcq(&question, Some(&Answer::from("Maybe")));
    assert!(unknown.has_code("invalid_choice"));

    let empty_other = validate_mcq(&question, Some(&Answer::from("Other: ")));
    assert!(empty_other.has_code("other_empty"));

    let wrong_shape = validate_mcq(&question, Some(&Answer::List(vec!["Yes".into()])));
    assert!(wrong_shape.has_code("type_mismatch"));
}

#[test]
fn mcq_other_tag_requires_an_other_choice() {
    let question = QuestionSpec::new("mcq", QuestionType::Mcq)
        .with_text("Pick")
        .with_choices(["Yes", "No"]);
    let check = validate_mcq(&question, Some(&Answer::from("Other: something")));
    assert!(check.has_code("invalid_choice"));
}

#[test]
fn mcq_multi_select_expects_a_list() {
    let mut question = mcq_with_other(true);
    question.mandatory = true;

    assert!(validate_mcq(&question, Some(&Answer::List(Vec::new()))).has_code("required"));
    assert!(
        validate_mcq(
            &question,
            Some(&Answer::List(vec!["Yes".into(), "No".into()]))
        )
        .valid
    );
    assert!(validate_mcq(&question, Some(&Answer::from("Yes"))).has_code("type_mismatch"));
}

#[test]
fn date_enforces_format_and_bounds() {
    let mut question = QuestionSpec::new("date", QuestionType::Date).with_text("When?");
    question.min_date = Some("2024-01-01".into());
    question.max_date = Some("2024-12-31".into());

    assert!(validate_date(&question, Some(&Answer::from("2024-06-15"))).valid);
    assert!(validate_date(&question, Some(&Answer::from("2023-12-31"))).has_code("min_date"));
    assert!(validate_date(&question, Some(&Answer::from("2025-01-01"))).has_code("max_date"));
    assert!(validate_date(&question, Some(&Answer::from("15/06/2024"))).has_code("invalid_date"));
    assert!(validate_date(&question, None).valid);
}

#[test]
fn mandatory_number_without_answer_reports_required() {
    let question = QuestionSpec::new("age", QuestionType::Number)
        .with_text("Age")
        .mandatory();

    let check = validate_number(&question, Some(&Answer::from("")));
    assert!(!check.valid);
    assert!(check.has_code("required"));
    assert!(check.messages()[0].contains("required"));

    assert!(validate_number(&question, Some(&Answer::from("4x"))).has_code("not_a_number"));
    assert!(validate_number(&question, Some(&Answer::from(" 42.5 "))).valid);
    assert!(validate_number(&question, Some(&Answer::Number(7.0))).valid);
}

#[test]
fn non_finite_numbers_are_rejected() {
    let mandatory = QuestionSpec::new("age", QuestionType::Number).mandatory();
    let optional = QuestionSpec::new("height", QuestionType::Number);

    for raw in ["NaN", "inf", "-infinity", " Infinity "] {
        let answer = Answer::from(raw);
        for question in [&mandatory, &optional] {
            let check = validate_number(question, Some(&answer));
            assert!(!check.valid, "{raw}");
            assert!(check.has_code("not_a_number"), "{raw}");
            assert!(!check.has_code("required"), "{raw}");
        }
    }

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let check = validate_number(&optional, Some(&Answer::Number(value)));
        assert!(check.has_code("not_a_number"));
    }
    assert!(!Answer::Number(f64::NAN).is_empty());
}

#[test]
fn upload_checks_count_and_file_types() {
    let mut question = QuestionSpec::new("cv", QuestionType::Upload)
        .with_text("Upload your CV")
        .mandatory();
    question.allowed_file_types = vec!["pdf".into(), ".DOCX".into()];

    assert!(validate_upload(&question, None).has_code("required"));
    assert!(validate_upload(&question, Some(&Answer::List(vec!["cv.pdf".into()]))).valid);
    assert!(validate_upload(&question, Some(&Answer::List(vec!["cv.docx".into()]))).valid);

    let two = Answer::List(vec!["a.pdf".into(), "b.pdf".into()]);
    assert!(validate_upload(&question, Some(&two)).has_code("single_file"));

    question.allow_multiple = true;
    assert!(validate_upload(&question, Some(&two)).valid);

    let image = Answer::List(vec!["photo.png".into()]);
    assert!(validate_upload(&question, Some(&image)).has_code("file_type"));
}

#[test]
fn unrecognized_type_never_validates() {
    let question = QuestionSpec::new("odd", QuestionType::Unrecognized).with_text("Odd");
    assert!(validate_answer(&question, Some(&Answer::from("x"))).has_code("unsupported_type"));
}

#[test]
fn constraint_sanity_reports_bad_declarations() {
    let mut date = QuestionSpec::new("date", QuestionType::Date).with_text("When?");
    date.min_date = Some("2024-12-31".into());
    date.max_date = Some("2024-01-01".into());
    assert_eq!(
        check_constraints(&date),
        vec!["minimum date is after maximum date".to_string()]
    );

    date.max_date = Some("not a date".into());
    assert!(check_constraints(&date)[0].contains("maximum date"));

    let empty_mcq = QuestionSpec::new("mcq", QuestionType::Mcq).with_text("Pick");
    assert_eq!(check_constraints(&empty_mcq).len(), 1);

    let duplicate = QuestionSpec::new("mcq", QuestionType::Mcq)
        .with_text("Pick")
        .with_choices(["A", "A"]);
    assert!(
        check_constraints(&duplicate)
            .iter()
            .any(|error| error.contains("unique"))
    );

    assert!(check_constraints(&essay(Some(10))).is_empty());
    assert!(!check_constraints(&essay(Some(0))).is_empty());
}
