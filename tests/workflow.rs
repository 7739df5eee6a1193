use std::{path::Path, sync::Arc};

use mammo_lingua::{
    error::WorkflowError,
    nlp::{
        ner::{Ner, Span},
        textcat::{CategoryScores, TextClassifier},
        Pipelines,
    },
    workflow::{SessionState, Workflow},
};

/// Tags every occurrence of a handful of fixed words.
struct KeywordNer;

impl Ner for KeywordNer {
    fn extract(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for (word, label) in [
            ("meme", "ANAT"),
            ("kitle", "OBS-PRESENT"),
            ("kalsifikasyon", "OBS-ABSENT"),
            ("BI-RADS", "IMPRESSION"),
        ] {
            for (start, found) in text.match_indices(word) {
                spans.push(Span::new(start, start + found.len(), label, found));
            }
        }
        spans.sort_by_key(|span| span.start);
        spans
    }
}

struct FixedClassifier;

impl TextClassifier for FixedClassifier {
    fn scores(&self, _text: &str) -> CategoryScores {
        vec![("3".to_string(), 0.25), ("4".to_string(), 0.75)]
            .into_iter()
            .collect()
    }
}

fn workflow() -> Workflow {
    Workflow::new(Pipelines::new(Arc::new(KeywordNer), Arc::new(FixedClassifier)))
}

fn write_report(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn load_show_save_walks_every_state() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "hasta12.txt", "Sol meme kitle.\\nkalsifikasyon yok. BI-RADS 4");
    let mut workflow = workflow();
    assert_eq!(workflow.state(), SessionState::Idle);

    let loaded = workflow.load_file(&report).unwrap();
    assert_eq!(loaded.content(), "Sol meme kitle. kalsifikasyon yok. BI-RADS 4");
    assert_eq!(workflow.state(), SessionState::FileLoaded);

    let record = workflow.show_results().unwrap().record.clone();
    assert_eq!(workflow.state(), SessionState::ResultsShown);
    assert_eq!(record.patient_id(), "hasta12");
    assert_eq!(record.source_reference(), "hasta12.txt");
    assert_eq!(record.anatomy(), ["meme"]);
    assert_eq!(record.observations_present(), ["kitle"]);
    assert_eq!(record.observations_absent(), ["kalsifikasyon"]);
    assert_eq!(record.birads_category(), "4");

    let out = dir.path().join("hasta12.json");
    let saved = workflow.save_results(&out).unwrap().to_path_buf();
    assert_eq!(saved, out);
    assert_eq!(workflow.state(), SessionState::Saved);
    assert_eq!(mammo_lingua::store::load_record(&out).unwrap(), record);

    // Saving again writes a fresh snapshot.
    let again = dir.path().join("copy.json");
    workflow.save_results(&again).unwrap();
    assert!(again.exists());
    assert_eq!(workflow.saved_to(), Some(again.as_path()));
}

#[test]
fn show_before_load_is_rejected() {
    let mut workflow = workflow();
    let err = workflow.show_results().unwrap_err();
    assert!(matches!(err, WorkflowError::NoReportLoaded));
    assert!(err.is_precondition());
    assert_eq!(workflow.state(), SessionState::Idle);
    assert!(workflow.results().is_none());
}

#[test]
fn save_before_show_is_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "p1.txt", "meme");
    let out = dir.path().join("p1.json");
    let mut workflow = workflow();

    let err = workflow.save_results(&out).unwrap_err();
    assert!(matches!(err, WorkflowError::NoResults));
    assert_eq!(workflow.state(), SessionState::Idle);

    workflow.load_file(&report).unwrap();
    let err = workflow.save_results(&out).unwrap_err();
    assert!(matches!(err, WorkflowError::NoResults));
    assert_eq!(workflow.state(), SessionState::FileLoaded);
    assert!(!out.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn failed_load_keeps_the_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "p2.txt", "kitle");
    let mut workflow = workflow();
    workflow.load_file(&report).unwrap();
    workflow.show_results().unwrap();

    let err = workflow.load_file(&dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, WorkflowError::ReadReport { .. }));
    assert_eq!(workflow.state(), SessionState::ResultsShown);
    assert_eq!(workflow.report().unwrap().patient_id(), "p2");
}

#[test]
fn undecodable_report_keeps_the_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "p4.txt", "meme");
    let bad = dir.path().join("bad.txt");
    std::fs::write(&bad, [0xff, 0xfe, b'k']).unwrap();
    let mut workflow = workflow();
    workflow.load_file(&report).unwrap();

    let err = workflow.load_file(&bad).unwrap_err();
    assert!(matches!(err, WorkflowError::ReadReport { .. }));
    assert_eq!(workflow.state(), SessionState::FileLoaded);
    assert_eq!(workflow.report().unwrap().patient_id(), "p4");
}

#[test]
fn loading_a_new_file_discards_old_results() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_report(dir.path(), "a.txt", "kitle");
    let second = write_report(dir.path(), "b.txt", "meme");
    let mut workflow = workflow();
    workflow.load_file(&first).unwrap();
    workflow.show_results().unwrap();

    workflow.load_file(&second).unwrap();
    assert_eq!(workflow.state(), SessionState::FileLoaded);
    assert!(workflow.results().is_none());
    let err = workflow.save_results(&dir.path().join("b.json")).unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn failed_save_leaves_results_shown() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report(dir.path(), "p3.txt", "meme kitle");
    let mut workflow = workflow();
    workflow.load_file(&report).unwrap();
    workflow.show_results().unwrap();

    let out = dir.path().join("no-such-dir").join("p3.json");
    let err = workflow.save_results(&out).unwrap_err();
    assert!(matches!(err, WorkflowError::WriteResults { .. }));
    assert!(!err.is_precondition());
    assert_eq!(workflow.state(), SessionState::ResultsShown);
    assert!(workflow.saved_to().is_none());
    assert!(!out.exists());
}
