use crate::document::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

static ENGLISH_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

/// Which tokens of a document are eligible for checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFilter {
    /// Keep only purely alphabetic ASCII tokens.
    pub english_only: bool,
    /// Maximum number of candidates handed to the oracle.
    pub limit: usize,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            english_only: false,
            limit: 1,
        }
    }
}

impl CandidateFilter {
    pub fn accepts(&self, token: &str) -> bool {
        starts_with_a(token) && (!self.english_only || is_english_word(token))
    }
}

pub fn starts_with_a(token: &str) -> bool {
    token.to_lowercase().starts_with('a')
}

pub fn is_english_word(token: &str) -> bool {
    ENGLISH_WORD_REGEX.is_match(token)
}

/// Whitespace-separated tokens of `text` that pass `filter`, in document
/// order, truncated to `filter.limit`. Punctuation stays attached to tokens.
pub fn candidate_words(text: &str, filter: &CandidateFilter) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| filter.accepts(token))
        .take(filter.limit)
        .map(str::to_string)
        .collect()
}

pub fn document_candidates(document: &Document, filter: &CandidateFilter) -> Vec<String> {
    let words = candidate_words(document.text(), filter);
    debug!(document = %document.name(), candidates = ?words, "extracted candidate words");
    words
}

/// Candidates of the document at `path`. Unreadable or malformed documents
/// yield no candidates.
pub fn read_candidates(path: &Path, filter: &CandidateFilter) -> Vec<String> {
    match Document::open(path) {
        Ok(document) => document_candidates(&document, filter),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read document");
            Vec::new()
        }
    }
}
