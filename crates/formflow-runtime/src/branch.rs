use formflow_spec::{AnswerMap, BranchRule, FormSpec};
use tracing::debug;

/// First rule on `page_idx` whose keyed question is answered and whose
/// condition holds. Rules are tried in declaration order.
pub fn firing_rule<'a>(
    form: &'a FormSpec,
    page_idx: usize,
    answers: &AnswerMap,
) -> Option<&'a BranchRule> {
    let page = form.pages.get(page_idx)?;
    page.branches.iter().find(|rule| {
        page.question_by_number(rule.question_number)
            .and_then(|question| answers.get(&question.id))
            .is_some_and(|answer| rule.condition.holds(answer))
    })
}

/// Index of the page shown after `page_idx`. The result never exceeds the
/// submission index.
pub fn resolve_next_page(form: &FormSpec, page_idx: usize, answers: &AnswerMap) -> usize {
    let Some(page) = form.pages.get(page_idx) else {
        return form.submission_index();
    };
    let target = match firing_rule(form, page_idx, answers) {
        Some(rule) => {
            debug!(page = page_idx, branch = %rule.id, target = rule.target_page, "branch fired");
            rule.target_page
        }
        None => page.linear_next(page_idx),
    };
    target.min(form.submission_index())
}

#[cfg(test)]
mod tests {
    use formflow_spec::{
        Answer, BranchCondition, BranchRule, FormSpec, PageSpec, QuestionSpec, QuestionType,
    };

    use super::*;

    fn rule(
        id: &str,
        question_number: usize,
        condition: BranchCondition,
        target: usize,
    ) -> BranchRule {
        BranchRule {
            id: id.into(),
            source_page: 0,
            question_number,
            condition,
            target_page: target,
        }
    }

    fn form(rules: Vec<BranchRule>) -> FormSpec {
        let mut first = PageSpec::new("One")
            .with_question(QuestionSpec::new("q1", QuestionType::Essay).with_text("First"))
            .with_question(QuestionSpec::new("q2", QuestionType::Essay).with_text("Second"));
        first.branches = rules;
        let mut form = FormSpec::new("f", "Form")
            .with_page(first)
            .with_page(PageSpec::new("Two"))
            .with_page(PageSpec::new("Three"))
            .with_page(PageSpec::new("Four"));
        form.renumber();
        form
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), Answer::from(*value)))
            .collect()
    }

    #[test]
    fn falls_through_without_rules() {
        let form = form(Vec::new());
        assert_eq!(resolve_next_page(&form, 0, &AnswerMap::new()), 1);
        assert_eq!(resolve_next_page(&form, 3, &AnswerMap::new()), 4);
        assert_eq!(resolve_next_page(&form, 9, &AnswerMap::new()), 4);
    }

    #[test]
    fn rules_use_page_local_question_numbers() {
        let form = form(vec![rule("b", 2, BranchCondition::include("go"), 3)]);
        assert_eq!(resolve_next_page(&form, 0, &answers(&[("q1", "go")])), 1);
        assert_eq!(resolve_next_page(&form, 0, &answers(&[("q2", "go")])), 3);
    }

    #[test]
    fn first_holding_rule_wins() {
        let form = form(vec![
            rule("a", 1, BranchCondition::include("x"), 2),
            rule("b", 2, BranchCondition::include("y"), 3),
        ]);
        let both = answers(&[("q1", "x"), ("q2", "y")]);
        assert_eq!(firing_rule(&form, 0, &both).map(|rule| rule.id.as_str()), Some("a"));
        assert_eq!(resolve_next_page(&form, 0, &answers(&[("q1", "z"), ("q2", "y")])), 3);
    }

    #[test]
    fn unanswered_questions_never_fire() {
        let form = form(vec![rule("b", 1, BranchCondition::exclude(["A"]), 3)]);
        assert_eq!(resolve_next_page(&form, 0, &AnswerMap::new()), 1);
    }

    #[test]
    fn explicit_next_page_and_clamping() {
        let mut form = form(vec![rule("b", 1, BranchCondition::include("far"), 40)]);
        form.pages[0].next_page = Some(2);
        assert_eq!(resolve_next_page(&form, 0, &AnswerMap::new()), 2);
        assert_eq!(resolve_next_page(&form, 0, &answers(&[("q1", "far")])), 4);
    }
}
