use std::path::PathBuf;

use mammo_lingua::{
    error::PipelineError,
    nlp::{
        pipeline::parse_pipeline,
        textcat::{self, CategoryScores, LinearTextcat, TextClassifier},
    },
};

fn classifier(raw: &str) -> Result<LinearTextcat, PipelineError> {
    let artifact = parse_pipeline(raw)
        .unwrap()
        .into_textcat(&PathBuf::from("textcat.json"))
        .unwrap();
    LinearTextcat::from_artifact(artifact)
}

const SMALL: &str = r#"{
    "kind": "textcat",
    "meta": { "name": "small", "version": "0.0.1" },
    "labels": ["1", "2", "4"],
    "weights": {
        "benign": [0.0, 2.0, 0.0],
        "suspicious": [0.0, 0.0, 2.0],
        "no mass": [3.0, 0.0, -1.0]
    }
}"#;

#[test]
fn exclusive_scores_form_a_distribution() {
    let model = classifier(SMALL).unwrap();
    let scores = model.scores("A suspicious focal asymmetry.");
    assert_eq!(scores.len(), 3);
    let total: f64 = scores.iter().map(|(_, score)| score).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(scores.iter().all(|(_, score)| (0.0..=1.0).contains(&score)));
    assert_eq!(model.classify("A suspicious focal asymmetry."), "4");
}

#[test]
fn bigrams_contribute_to_scores() {
    let model = classifier(SMALL).unwrap();
    assert_eq!(model.classify("No mass is seen."), "1");
    assert_eq!(model.classify("Benign appearing cyst."), "2");
}

#[test]
fn exact_ties_resolve_to_first_label_in_pipeline_order() {
    let model = classifier(SMALL).unwrap();
    let scores = model.scores("nothing relevant here");
    assert_eq!(scores.get("1"), scores.get("4"));
    assert_eq!(scores.top_label(), Some("1"));
    assert_eq!(model.classify("nothing relevant here"), "1");
}

#[test]
fn ranking_is_stable_for_equal_scores() {
    let scores: CategoryScores = vec![
        ("3".to_string(), 0.2),
        ("5".to_string(), 0.4),
        ("0".to_string(), 0.4),
    ]
    .into_iter()
    .collect();
    let ranked: Vec<&str> = scores.ranked().into_iter().map(|(label, _)| label).collect();
    assert_eq!(ranked, vec!["5", "0", "3"]);
    assert_eq!(scores.top_label(), Some("5"));
}

#[test]
fn sigmoid_scores_are_independent() {
    let raw = r#"{
        "kind": "textcat",
        "meta": { "name": "multi", "version": "0" },
        "labels": ["a", "b"],
        "exclusive": false
    }"#;
    let scores = classifier(raw).unwrap().scores("anything");
    assert_eq!(scores.get("a"), Some(0.5));
    assert_eq!(scores.get("b"), Some(0.5));
}

#[test]
fn empty_label_set_is_rejected() {
    let raw = r#"{ "kind": "textcat", "meta": { "name": "e", "version": "0" }, "labels": [] }"#;
    assert!(matches!(classifier(raw), Err(PipelineError::EmptyLabels)));
}

#[test]
fn weight_rows_must_match_label_count() {
    let raw = r#"{
        "kind": "textcat",
        "meta": { "name": "s", "version": "0" },
        "labels": ["a", "b"],
        "weights": { "mass": [1.0] }
    }"#;
    match classifier(raw) {
        Err(PipelineError::Shape {
            term,
            expected,
            found,
        }) => {
            assert_eq!(term, "mass");
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        _ => panic!("expected a shape error"),
    }
}

#[test]
fn terms_differing_only_in_case_are_rejected() {
    let raw = r#"{
        "kind": "textcat",
        "meta": { "name": "d", "version": "0" },
        "labels": ["a", "b"],
        "weights": { "Cyst": [1.0, 0.0], "cyst": [0.0, 1.0] }
    }"#;
    match classifier(raw) {
        Err(PipelineError::DuplicateTerm(term)) => assert_eq!(term, "cyst"),
        _ => panic!("expected a duplicate term error"),
    }
}

#[tokio::test]
async fn shipped_model_predicts_sample_categories() {
    let model = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/nlp_models/classification_model");
    let classifier = textcat::load_model(&model).await.unwrap();
    assert_eq!(
        classifier.classify("Irregular spiculated mass. Suspicious, biopsy recommended."),
        "4"
    );
    assert_eq!(
        classifier.classify("Stable benign cyst in the right breast."),
        "2"
    );
}
