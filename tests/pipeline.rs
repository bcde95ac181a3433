mod common;

use common::{docx, StubOracle};
use spellcheck_pro::{CandidateFilter, Document, SpellCheckResult, SpellChecker};
use std::path::Path;

fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, docx(paragraphs)).unwrap();
    path
}

fn paragraph_texts(path: &Path) -> Vec<String> {
    Document::open(path)
        .unwrap()
        .paragraphs()
        .map(|p| p.text().to_string())
        .collect()
}

#[test]
fn document_without_a_words_makes_no_calls() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_docx(input.path(), "plain.docx", &["The quick brown fox", "jumps over"]);

    let checker = SpellChecker::new(StubOracle::default()).with_output_dir(output.path());
    let analysis = checker.check_file(&path).unwrap();

    assert!(!analysis.has_candidates());
    assert_eq!(analysis.total_words, 0);
    assert_eq!(analysis.modified_document, None);
    assert!(checker.oracle().asked().is_empty());
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn correct_word_leaves_document_alone() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_docx(input.path(), "fruit.docx", &["Apple is a fruit."]);

    let oracle = StubOracle::default().with(SpellCheckResult::correct("Apple"));
    let checker = SpellChecker::new(oracle).with_output_dir(output.path());
    let analysis = checker.check_file(&path).unwrap();

    assert_eq!(checker.oracle().asked(), vec!["Apple"]);
    assert_eq!(analysis.correct_words, 1);
    assert_eq!(analysis.modified_document, None);
    assert_eq!(paragraph_texts(&path), vec!["Apple is a fruit."]);
}

#[test]
fn suggestion_is_written_to_modified_copy() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_docx(
        input.path(),
        "fruit.docx",
        &["Aple is a fruit.", "An aple a day; pineaple is different."],
    );

    let oracle = StubOracle::default().with(SpellCheckResult::with_suggestion("Aple", "Apple"));
    let checker = SpellChecker::new(oracle).with_output_dir(output.path());
    let analysis = checker.check_file(&path).unwrap();

    let modified = analysis.modified_document.clone().unwrap();
    assert_eq!(modified, output.path().join("modified_fruit.docx"));
    assert_eq!(
        paragraph_texts(&modified),
        vec!["Apple is a fruit.", "An Apple a day; pineaple is different."]
    );
    assert_eq!(paragraph_texts(&path), vec!["Aple is a fruit.", "An aple a day; pineaple is different."]);
    assert_eq!(analysis.summary()[3], "- Aple (suggested correction: Apple)");
}

#[test]
fn server_error_inserts_marker() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_docx(input.path(), "fruit.docx", &["Aple is a fruit."]);

    let oracle = StubOracle::default()
        .with(SpellCheckResult::failed("Aple", "Unexpected status code: 500"));
    let checker = SpellChecker::new(oracle).with_output_dir(output.path());
    let analysis = checker.check_file(&path).unwrap();

    assert_eq!(
        analysis.results,
        vec![SpellCheckResult::failed("Aple", "Unexpected status code: 500")]
    );
    let modified = analysis.modified_document.unwrap();
    assert_eq!(
        paragraph_texts(&modified),
        vec!["[CORRECTION NEEDED: Aple] is a fruit."]
    );
}

#[test]
fn repeated_runs_produce_identical_output() {
    let input = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let path = write_docx(input.path(), "fruit.docx", &["Aple is a fruit.", "Nothing else"]);

    let run = |out: &Path| {
        let oracle =
            StubOracle::default().with(SpellCheckResult::with_suggestion("Aple", "Apple"));
        SpellChecker::new(oracle)
            .with_output_dir(out)
            .check_file(&path)
            .unwrap()
            .modified_document
            .unwrap()
    };

    let a = std::fs::read(run(first.path())).unwrap();
    let b = std::fs::read(run(second.path())).unwrap();
    assert_eq!(a, b);

    // Overwrites in place on a rerun into the same directory.
    let again = std::fs::read(run(first.path())).unwrap();
    assert_eq!(a, again);
}

#[test]
fn limit_controls_how_many_words_are_checked() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_docx(input.path(), "words.docx", &["Aple and Avocdo, also ant"]);

    let oracle = StubOracle::default()
        .with(SpellCheckResult::with_suggestion("Aple", "Apple"))
        .with(SpellCheckResult::incorrect("Avocdo,"));

    let checker = SpellChecker::new(oracle)
        .with_output_dir(output.path())
        .with_filter(CandidateFilter {
            english_only: false,
            limit: 10,
        });
    let analysis = checker.check_file(&path).unwrap();

    assert_eq!(checker.oracle().asked(), vec!["Aple", "and", "Avocdo,", "also", "ant"]);
    assert_eq!(analysis.total_words, 5);
    assert_eq!(analysis.misspelled_words, 2);
    // A trailing comma leaves no word boundary before the following space.
    assert_eq!(
        paragraph_texts(&analysis.modified_document.unwrap()),
        vec!["Apple and Avocdo, also ant"]
    );
}

#[test]
fn english_only_filter_skips_punctuated_words() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = write_docx(input.path(), "words.docx", &["Avocdo, aardvark"]);

    let checker = SpellChecker::new(StubOracle::default())
        .with_output_dir(output.path())
        .with_filter(CandidateFilter {
            english_only: true,
            limit: 1,
        });
    checker.check_file(&path).unwrap();

    assert_eq!(checker.oracle().asked(), vec!["aardvark"]);
}

#[test]
fn unreadable_document_reports_no_words() {
    let input = tempfile::tempdir().unwrap();
    let path = input.path().join("broken.docx");
    std::fs::write(&path, b"definitely not a docx").unwrap();

    let checker = SpellChecker::new(StubOracle::default()).with_output_dir(input.path());
    let analysis = checker.check_file(&path).unwrap();

    assert_eq!(analysis.document, "broken.docx");
    assert!(!analysis.has_candidates());
    assert!(checker.oracle().asked().is_empty());
}
