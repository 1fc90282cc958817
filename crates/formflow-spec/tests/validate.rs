use formflow_spec::{
    BranchCondition, BranchRule, FormSpec, PageSpec, QuestionSpec, QuestionType, validate,
};

fn vest_question() -> QuestionSpec {
    QuestionSpec::new("vest", QuestionType::Mcq)
        .with_text("Need a vest?")
        .with_choices(["Yes", "No"])
}

fn rule(id: &str, question_number: usize, condition: BranchCondition, target: usize) -> BranchRule {
    BranchRule {
        id: id.into(),
        source_page: 0,
        question_number,
        condition,
        target_page: target,
    }
}

fn two_page_form() -> FormSpec {
    let mut form = FormSpec::new("vest-form", "Vests")
        .with_page(
            PageSpec::new("Gear")
                .with_question(vest_question())
                .with_branch(rule("b1", 1, BranchCondition::include("No"), 1)),
        )
        .with_page(
            PageSpec::new("Details").with_question(
                QuestionSpec::new("size", QuestionType::Essay).with_text("Size?"),
            ),
        );
    form.renumber();
    form
}

#[test]
fn empty_form_has_errors_and_no_pages() {
    let form = FormSpec::new("empty", "Empty");
    let report = validate(&form);
    assert!(report.has_errors);
    assert!(report.sanitized_pages.is_empty());
    assert_eq!(report.form_errors, vec!["form has no pages".to_string()]);
}

#[test]
fn valid_form_passes_and_is_sanitized() {
    let mut form = two_page_form();
    form.pages[0].title = "  Gear  ".into();
    form.pages[1].questions[0].choices = vec![formflow_spec::Choice::new("stray")];

    let report = validate(&form);
    assert!(!report.has_errors, "unexpected errors: {report:?}");
    assert_eq!(report.sanitized_pages[0].title, "Gear");
    assert!(report.sanitized_pages[1].questions[0].choices.is_empty());
    assert_eq!(report.sanitized_pages[1].questions[0].question_number, 2);
}

#[test]
fn violations_are_aggregated_per_page_question_and_branch() {
    let mut form = two_page_form();
    form.pages[0].title.clear();
    form.pages[0].questions[0].text.clear();
    form.pages[0].questions[0].choices.clear();
    form.pages[1].questions.clear();
    form.pages[0].branches.push(rule("b2", 3, BranchCondition::include(""), 7));

    let report = validate(&form);
    assert!(report.has_errors);

    let first = &report.page_errors[&0];
    assert_eq!(first.page, vec!["page title is required".to_string()]);
    assert_eq!(first.questions[&0].len(), 2);
    assert_eq!(
        report.page_errors[&1].page,
        vec!["page needs at least one question".to_string()]
    );

    let branch = &report.branch_errors["b2"];
    assert_eq!(branch.len(), 3);
    assert!(branch[0].contains("question 3"));
    assert!(branch[1].contains("trigger value"));
    assert!(branch[2].contains("out of range"));
    assert!(report.error_count() >= 7);
}

#[test]
fn branch_rules_must_point_forward() {
    let mut form = two_page_form();
    form.pages[1].branches.push(rule("back", 1, BranchCondition::include("x"), 0));
    form.pages[0].next_page = Some(0);

    let report = validate(&form);
    assert!(report.branch_errors["back"][0].contains("after the source page"));
    assert!(report.page_errors[&0].page[0].contains("after this page"));
}

#[test]
fn exclude_values_must_be_choices_and_encodable() {
    let mut form = two_page_form();
    form.pages[0].branches[0].condition = BranchCondition::exclude(["Yes", "Maybe, later"]);

    let report = validate(&form);
    let errors = &report.branch_errors["b1"];
    assert!(errors.iter().any(|error| error.contains("cannot contain")));
    assert!(errors.iter().any(|error| error.contains("not a choice")));
}

#[test]
fn rule_targeting_the_linear_successor_is_valid() {
    let report = validate(&two_page_form());
    assert!(report.branch_errors.is_empty());
}
