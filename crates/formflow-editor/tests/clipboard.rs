use formflow_editor::{EditorSession, QuestionField};

fn session_with_questions() -> (EditorSession, Vec<String>) {
    let mut session = EditorSession::new("clip", "Clipboard");
    session.add_page();
    session.add_page();
    let mut ids = Vec::new();
    for (page, text) in [(0, "First"), (0, "Second"), (1, "Third"), (1, "Fourth")] {
        let id = session.add_question(page).unwrap();
        let idx = session.form().pages[page].position_of(&id).unwrap();
        session.change_question_field(page, idx, QuestionField::Text(text.into()));
        ids.push(id);
    }
    (session, ids)
}

fn texts(session: &EditorSession) -> Vec<&str> {
    session
        .form()
        .questions()
        .map(|question| question.text.as_str())
        .collect()
}

#[test]
fn copy_leaves_the_document_unchanged() {
    let (mut session, ids) = session_with_questions();
    let before = serde_json::to_string(session.form()).unwrap();

    assert!(session.select(&ids[3]));
    assert!(session.select(&ids[0]));
    assert_eq!(session.copy_selection(), 2);

    assert_eq!(serde_json::to_string(session.form()).unwrap(), before);
    let copied: Vec<&str> = session
        .clipboard()
        .iter()
        .map(|question| question.text.as_str())
        .collect();
    assert_eq!(copied, vec!["First", "Fourth"], "clipboard keeps document order");
}

#[test]
fn cut_removes_exactly_the_selection_across_pages() {
    let (mut session, ids) = session_with_questions();
    session.select(&ids[1]);
    session.select(&ids[2]);

    assert_eq!(session.cut_selection(), 2);
    assert_eq!(texts(&session), vec!["First", "Fourth"]);
    let numbers: Vec<usize> = session
        .form()
        .questions()
        .map(|question| question.question_number)
        .collect();
    assert_eq!(numbers, vec![1, 2]);
    assert!(session.selection().is_empty());
    assert_eq!(session.clipboard().len(), 2);
}

#[test]
fn paste_clones_with_fresh_ids_and_can_repeat() {
    let (mut session, ids) = session_with_questions();
    session.select(&ids[0]);
    session.copy_selection();

    let first = session.paste_selection(1);
    let second = session.paste_selection(1);
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first[0], ids[0]);
    assert_ne!(first[0], second[0]);

    assert_eq!(texts(&session), vec!["First", "Second", "Third", "Fourth", "First", "First"]);
    assert!(session.form().numbering_is_dense());
}

#[test]
fn cut_then_paste_moves_questions() {
    let (mut session, ids) = session_with_questions();
    session.select(&ids[0]);
    session.cut_selection();
    let pasted = session.paste_selection(1);

    assert_eq!(texts(&session), vec!["Second", "Third", "Fourth", "First"]);
    assert_eq!(session.form().question(&pasted[0]).unwrap().question_number, 4);
    assert!(session.form().question(&ids[0]).is_none());
}

#[test]
fn selection_ignores_unknown_ids_and_toggles() {
    let (mut session, ids) = session_with_questions();
    assert!(!session.select("nope"));
    assert!(session.toggle_selection(&ids[1]));
    assert!(!session.toggle_selection(&ids[1]));
    assert!(session.selection().is_empty());
    assert_eq!(session.copy_selection(), 0);
    assert_eq!(session.cut_selection(), 0);
}

#[test]
fn sessions_do_not_share_clipboards() {
    let (mut first, ids) = session_with_questions();
    let (mut second, _) = session_with_questions();
    first.select(&ids[0]);
    first.copy_selection();

    assert!(second.clipboard().is_empty());
    assert!(second.paste_selection(0).is_empty());
}

#[test]
fn removing_a_selected_question_prunes_the_selection() {
    let (mut session, ids) = session_with_questions();
    session.select(&ids[0]);
    session.remove_question(0, 0);
    assert!(session.selection().is_empty());
}
