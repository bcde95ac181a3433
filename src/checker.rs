use crate::annotator::annotate_and_save;
use crate::document::Document;
use crate::oracle::{SpellCheckResult, SpellingOracle};
use crate::reader::{document_candidates, CandidateFilter};
use crate::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentAnalysis {
    pub document: String,
    pub candidates: Vec<String>,
    pub results: Vec<SpellCheckResult>,
    pub total_words: usize,
    pub correct_words: usize,
    pub misspelled_words: usize,
    pub accuracy: f32,
    pub modified_document: Option<PathBuf>,
}

impl DocumentAnalysis {
    fn new(document: &str, candidates: Vec<String>, results: Vec<SpellCheckResult>) -> Self {
        let total_words = results.len();
        let correct_words = results.iter().filter(|r| r.is_correct).count();
        Self {
            document: document.to_string(),
            candidates,
            total_words,
            correct_words,
            misspelled_words: total_words - correct_words,
            accuracy: calculate_accuracy(correct_words, total_words),
            results,
            modified_document: None,
        }
    }

    fn empty(document: &str) -> Self {
        Self::new(document, Vec::new(), Vec::new())
    }

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn misspelled(&self) -> impl Iterator<Item = &SpellCheckResult> {
        self.results.iter().filter(|r| !r.is_correct)
    }

    /// Report lines shown after a check.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total words checked: {}", self.total_words),
            format!("Correct spellings: {}", self.correct_words),
            format!("Incorrect spellings: {}", self.misspelled_words),
        ];
        lines.extend(self.misspelled().map(describe_misspelling));
        lines
    }
}

pub fn describe_misspelling(result: &SpellCheckResult) -> String {
    let suggestion = result
        .suggestion
        .as_deref()
        .unwrap_or("No suggestion available");
    match &result.error {
        Some(error) => format!("- {} (suggested correction: {suggestion}; {error})", result.word),
        None => format!("- {} (suggested correction: {suggestion})", result.word),
    }
}

pub fn calculate_accuracy(correct: usize, total: usize) -> f32 {
    if total == 0 {
        100.0
    } else {
        (correct as f32 / total as f32 * 100.0).round()
    }
}

/// Runs the read, check, annotate pipeline for one document at a time.
pub struct SpellChecker<O> {
    oracle: O,
    filter: CandidateFilter,
    output_dir: PathBuf,
}

impl<O: SpellingOracle> SpellChecker<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            filter: CandidateFilter::default(),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_filter(mut self, filter: CandidateFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn check_file(&self, path: &Path) -> Result<DocumentAnalysis> {
        match Document::open(path) {
            Ok(document) => self.check_document(document),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read document");
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(DocumentAnalysis::empty(&name))
            }
        }
    }

    /// Checks every candidate word of `document` and saves an annotated
    /// copy if any paragraph changed. Transport errors abort the check.
    pub fn check_document(&self, mut document: Document) -> Result<DocumentAnalysis> {
        let candidates = document_candidates(&document, &self.filter);
        if candidates.is_empty() {
            info!(document = %document.name(), "no candidate words found");
            return Ok(DocumentAnalysis::empty(document.name()));
        }

        let results = candidates
            .iter()
            .map(|word| self.oracle.check(word))
            .collect::<Result<Vec<_>>>()?;

        let mut analysis = DocumentAnalysis::new(document.name(), candidates, results);
        analysis.modified_document =
            annotate_and_save(&mut document, &analysis.results, &self.output_dir)?;

        info!(
            document = %analysis.document,
            checked = analysis.total_words,
            misspelled = analysis.misspelled_words,
            "spell check finished"
        );
        Ok(analysis)
    }

    pub fn check_word(&self, word: &str) -> Result<SpellCheckResult> {
        self.oracle.check(word)
    }
}
