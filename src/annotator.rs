//! Flags misspelled words in a document.
//!
//! Substitution is plain text: a flagged word is replaced by its suggestion,
//! or by a `[CORRECTION NEEDED: word]` marker when there is none. No Word
//! revision markup is produced.

use crate::document::Document;
use crate::oracle::SpellCheckResult;
use crate::Result;
use regex::{NoExpand, Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const OUTPUT_PREFIX: &str = "modified_";

pub fn correction_marker(word: &str) -> String {
    format!("[CORRECTION NEEDED: {word}]")
}

/// Text that replaces the result's word, or `None` if the word is correct.
pub fn replacement_for(result: &SpellCheckResult) -> Option<String> {
    if result.is_correct {
        return None;
    }
    Some(
        result
            .suggestion
            .clone()
            .unwrap_or_else(|| correction_marker(&result.word)),
    )
}

/// Case-insensitive whole-word pattern matching `word` literally.
pub fn word_pattern(word: &str) -> Result<Regex> {
    let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(word)))
        .case_insensitive(true)
        .build()?;
    Ok(pattern)
}

/// Name the annotated copy of `name` is saved under.
pub fn output_file_name(name: &str) -> String {
    format!("{OUTPUT_PREFIX}{name}")
}

/// Replaces every flagged word in every paragraph. Returns the number of
/// paragraphs whose text changed.
pub fn annotate(document: &mut Document, results: &[SpellCheckResult]) -> Result<usize> {
    let substitutions = results
        .iter()
        .filter_map(|result| {
            replacement_for(result).map(|replacement| {
                word_pattern(&result.word).map(|pattern| (pattern, replacement))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if substitutions.is_empty() {
        return Ok(0);
    }

    let mut changed = 0;
    for paragraph in document.paragraphs_mut() {
        let mut text = paragraph.text().to_string();
        for (pattern, replacement) in &substitutions {
            if pattern.is_match(&text) {
                text = pattern
                    .replace_all(&text, NoExpand(replacement.as_str()))
                    .into_owned();
            }
        }
        if text != paragraph.text() {
            debug!(before = paragraph.text(), after = %text, "rewrote paragraph");
            paragraph.set_text(text);
            changed += 1;
        }
    }

    Ok(changed)
}

/// Annotates `document` and, if anything changed, saves it as
/// `modified_<name>` in `output_dir`, overwriting any earlier copy.
pub fn annotate_and_save(
    document: &mut Document,
    results: &[SpellCheckResult],
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let changed = annotate(document, results)?;
    if changed == 0 {
        info!(document = %document.name(), "no changes were made to the document");
        return Ok(None);
    }

    let path = output_dir.join(output_file_name(document.name()));
    document.save(&path)?;
    info!(path = %path.display(), paragraphs = changed, "saved modified document");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures;
    use crate::document::Paragraph;

    fn document(paragraphs: &[&str]) -> Document {
        Document::from_bytes("essay.docx", fixtures::docx(paragraphs)).unwrap()
    }

    fn texts(document: &Document) -> Vec<String> {
        document.paragraphs().map(Paragraph::text).map(str::to_string).collect()
    }

    #[test]
    fn correct_word_leaves_text_unchanged() {
        let mut doc = document(&["Apple is a fruit."]);
        let changed = annotate(&mut doc, &[SpellCheckResult::correct("Apple")]).unwrap();
        assert_eq!(changed, 0);
        assert_eq!(texts(&doc), vec!["Apple is a fruit."]);
        assert!(!doc.is_modified());
    }

    #[test]
    fn suggestion_replaces_word() {
        let mut doc = document(&["Aple is a fruit."]);
        annotate(&mut doc, &[SpellCheckResult::with_suggestion("Aple", "Apple")]).unwrap();
        assert_eq!(texts(&doc), vec!["Apple is a fruit."]);
    }

    #[test]
    fn replaces_every_whole_word_case_insensitively() {
        let mut doc = document(&["aple, APLE and Aple.", "Aples and pineaple stay", "no match"]);
        let changed =
            annotate(&mut doc, &[SpellCheckResult::with_suggestion("Aple", "Apple")]).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            texts(&doc),
            vec!["Apple, Apple and Apple.", "Aples and pineaple stay", "no match"]
        );
    }

    #[test]
    fn missing_suggestion_inserts_marker() {
        let mut doc = document(&["Aple is a fruit."]);
        annotate(&mut doc, &[SpellCheckResult::failed("Aple", "Unexpected status code: 500")])
            .unwrap();
        assert_eq!(texts(&doc), vec!["[CORRECTION NEEDED: Aple] is a fruit."]);
    }

    #[test]
    fn replacement_is_inserted_literally() {
        let mut doc = document(&["Aple pie"]);
        annotate(&mut doc, &[SpellCheckResult::with_suggestion("Aple", "$1 ${x}")]).unwrap();
        assert_eq!(texts(&doc), vec!["$1 ${x} pie"]);
    }

    #[test]
    fn word_with_regex_metacharacters_is_escaped() {
        let pattern = word_pattern("a.b").unwrap();
        assert!(pattern.is_match("see a.b here"));
        assert!(!pattern.is_match("see axb here"));
    }

    #[test]
    fn save_skipped_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = document(&["Apple is a fruit."]);
        let saved = annotate_and_save(&mut doc, &[SpellCheckResult::incorrect("Avocado")], dir.path())
            .unwrap();
        assert_eq!(saved, None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn saves_modified_copy_with_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = document(&["Aple is a fruit."]);
        let saved = annotate_and_save(
            &mut doc,
            &[SpellCheckResult::with_suggestion("Aple", "Apple")],
            dir.path(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(saved, dir.path().join("modified_essay.docx"));
        let reloaded = Document::open(&saved).unwrap();
        assert_eq!(texts(&reloaded), vec!["Apple is a fruit."]);
    }
}
