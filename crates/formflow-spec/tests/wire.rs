use serde_json::json;

use formflow_spec::wire::{decode_assert_on, encode_assert_on};
use formflow_spec::{BranchCondition, ConditionMode, FormDocument, QuestionType, WireError};

fn stored_document() -> serde_json::Value {
    json!({
        "id": "vests",
        "title": "Vests",
        "description": "Safety gear",
        "pages": [
            {
                "title": "Gear",
                "description": "",
                "nextPage": 1,
                "questions": [
                    {
                        "id": "q-vest",
                        "questionNumber": 1,
                        "text": "Need a vest?",
                        "questionType": "MCQ",
                        "isMandatory": true,
                        "choices": [
                            { "text": "Yes", "choiceNumber": 1 },
                            { "text": "No", "choiceNumber": 2 }
                        ]
                    }
                ],
                "branches": [
                    {
                        "id": "b-legacy",
                        "questionNumber": 1,
                        "assertOn": "[Yes]",
                        "targetPage": 2,
                        "sourcePage": 0
                    }
                ]
            },
            {
                "title": "Sizes",
                "nextPage": 3,
                "questions": [
                    {
                        "id": "q-size",
                        "questionNumber": 9,
                        "text": "Which size?",
                        "questionType": "Essay",
                        "maxLength": 10
                    },
                    {
                        "id": "q-proof",
                        "text": "Proof of purchase",
                        "questionType": "Upload",
                        "maxFileSizeMB": 5,
                        "allowedFileTypes": ["pdf"]
                    }
                ]
            },
            {
                "title": "Done",
                "questions": [
                    { "id": "q-when", "text": "When?", "questionType": "Date" }
                ]
            }
        ]
    })
}

#[test]
fn stored_document_decodes_and_renumbers() {
    let document: FormDocument =
        serde_json::from_value(stored_document()).expect("fixture should deserialize");
    let form = document.into_spec().expect("document should decode");

    assert_eq!(form.pages.len(), 3);
    assert_eq!(form.pages[0].next_page, None, "default successor is implicit");
    assert_eq!(form.pages[1].next_page, Some(3));
    let numbers: Vec<usize> = form.questions().map(|q| q.question_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);

    let branch = &form.pages[0].branches[0];
    assert_eq!(branch.condition.mode, ConditionMode::Exclude);
    assert_eq!(branch.condition.values, vec!["Yes".to_string()]);

    let proof = form.question("q-proof").expect("upload question");
    assert_eq!(proof.kind, QuestionType::Upload);
    assert_eq!(proof.max_file_size_mb, Some(5));
}

#[test]
fn encoding_writes_explicit_next_page_and_bracketed_sets() {
    let document: FormDocument = serde_json::from_value(stored_document()).unwrap();
    let form = document.into_spec().unwrap();

    let encoded = serde_json::to_value(FormDocument::from(&form)).unwrap();
    assert_eq!(encoded["pages"][0]["nextPage"], 1);
    assert_eq!(encoded["pages"][2]["nextPage"], 3);
    assert_eq!(encoded["pages"][0]["branches"][0]["assertOn"], "[Yes]");
    assert_eq!(encoded["pages"][0]["branches"][0]["exclude"], true);
    assert_eq!(encoded["pages"][1]["questions"][1]["maxFileSizeMB"], 5);
    assert!(encoded["pages"][1].get("branches").is_none());

    let again = FormDocument::from_json(&encoded.to_string())
        .unwrap()
        .into_spec()
        .unwrap();
    assert_eq!(again, form);
}

#[test]
fn assert_on_encoding_follows_mode() {
    assert_eq!(encode_assert_on(&BranchCondition::include("Yes")), "Yes");
    assert_eq!(
        encode_assert_on(&BranchCondition::exclude(["A", "B"])),
        "[A, B]"
    );

    let include = decode_assert_on("b", "[not a list]", Some(false)).unwrap();
    assert_eq!(include, BranchCondition::include("[not a list]"));

    let exclude = decode_assert_on("b", " [A,  B ,] ", None).unwrap();
    assert_eq!(exclude, BranchCondition::exclude(["A", "B"]));

    let err = decode_assert_on("b", "A", Some(true)).unwrap_err();
    assert!(matches!(err, WireError::ExpectedBracketList { .. }));
}

#[test]
fn unknown_question_types_survive_decoding() {
    let mut raw = stored_document();
    raw["pages"][2]["questions"][0]["questionType"] = json!("Slider");
    let form = serde_json::from_value::<FormDocument>(raw)
        .unwrap()
        .into_spec()
        .unwrap();
    assert_eq!(
        form.question("q-when").unwrap().kind,
        QuestionType::Unrecognized
    );
    assert!(formflow_spec::validate(&form).has_errors);
}
