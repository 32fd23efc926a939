// tests/terms_files.rs
use cmv_discussion_analyzer::terms::{
    compile_topics, load_terms_file, term_path, EVIDENCE_CATEGORY, TOPICS_CATEGORY,
};
use cmv_discussion_analyzer::{Classifier, MatchMode, Normalizer, TermError};
use std::fs;

#[test]
fn loads_stems_and_names_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("politics.txt");
    fs::write(&p, "Voters\nvoter\nMake America Great Again\n\n").unwrap();

    let n = Normalizer::default();
    let list = load_terms_file(&p, true, &n).unwrap();
    assert_eq!(list.name, "politics");
    assert_eq!(list.len(), 2);
    assert_eq!(list.longest(), 4);
}

#[test]
fn compile_topics_reads_category_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(TOPICS_CATEGORY)).unwrap();
    fs::create_dir_all(root.join(EVIDENCE_CATEGORY)).unwrap();
    fs::write(term_path(root, TOPICS_CATEGORY, "religion"), "god\nchurch\n").unwrap();
    fs::write(term_path(root, TOPICS_CATEGORY, "race"), "racism\n").unwrap();
    fs::write(term_path(root, EVIDENCE_CATEGORY, "numbers"), "percent\n").unwrap();

    let n = Normalizer::default();
    let topics = compile_topics(root, TOPICS_CATEGORY, &["religion", "race"], &n).unwrap();
    assert_eq!(topics.names().collect::<Vec<_>>(), vec!["race", "religion"]);

    let evidence = compile_topics(root, EVIDENCE_CATEGORY, &["numbers"], &n).unwrap();
    let c = Classifier::new(n, MatchMode::Legacy);
    let out = c.classify("there are 3 reasons", &evidence).unwrap();
    assert!(out["numbers"].matched);
    assert_eq!(out["numbers"].terms, vec![vec!["3".to_string()]]);
}

#[test]
fn missing_list_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let n = Normalizer::default();
    let err = compile_topics(dir.path(), TOPICS_CATEGORY, &["gender"], &n).unwrap_err();
    assert!(matches!(err, TermError::Io { .. }));
    assert!(err.to_string().contains("gender.txt"));
}

#[test]
fn empty_file_surfaces_at_classification() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(TOPICS_CATEGORY)).unwrap();
    fs::write(term_path(dir.path(), TOPICS_CATEGORY, "moral"), "\n\n").unwrap();

    let n = Normalizer::default();
    let topics = compile_topics(dir.path(), TOPICS_CATEGORY, &["moral"], &n).unwrap();
    let c = Classifier::new(n, MatchMode::Legacy);
    assert!(c.classify("anything", &topics).is_err());
}
