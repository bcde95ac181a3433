//! Client for the Oxford Dictionaries API, the authority on whether a word
//! is spelled correctly.

use crate::config::{Config, Credentials};
use crate::language::Language;
use crate::{Result, SpellCheckerError};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://od-api-sandbox.oxforddictionaries.com/api/v2";

/// Which lookup the client performs for a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// `search/{lang}?q={word}`; the top match decides and may be offered
    /// as a suggestion.
    #[default]
    Search,
    /// `entries/{lang}/{word}`; the word is correct iff an entry exists.
    Entries,
}

impl Endpoint {
    pub fn all() -> Vec<Endpoint> {
        vec![Endpoint::Search, Endpoint::Entries]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Search => "Search",
            Endpoint::Entries => "Entry lookup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellCheckResult {
    pub word: String,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<String>,
}

impl SpellCheckResult {
    pub fn correct(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_correct: true,
            suggestion: None,
            error: None,
            definitions: Vec::new(),
        }
    }

    pub fn incorrect(word: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            ..Self::correct(word)
        }
    }

    /// An incorrect result offering `suggestion`. A suggestion that only
    /// differs from the word by case is not kept.
    pub fn with_suggestion(word: impl Into<String>, suggestion: impl Into<String>) -> Self {
        let mut result = Self::incorrect(word);
        let suggestion = suggestion.into();
        if suggestion.to_lowercase() != result.word.to_lowercase() {
            result.suggestion = Some(suggestion);
        }
        result
    }

    pub fn failed(word: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::incorrect(word)
        }
    }

    pub fn unexpected_status(word: impl Into<String>, status: StatusCode) -> Self {
        Self::failed(word, format!("Unexpected status code: {}", status.as_u16()))
    }
}

/// Anything that can judge the spelling of a single word.
pub trait SpellingOracle {
    /// Transport failures are returned as errors; every answer the service
    /// gives, including error statuses, becomes a result.
    fn check(&self, word: &str) -> Result<SpellCheckResult>;
}

impl<T: SpellingOracle + ?Sized> SpellingOracle for &T {
    fn check(&self, word: &str) -> Result<SpellCheckResult> {
        (**self).check(word)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    word: String,
}

#[derive(Deserialize)]
struct EntryResponse {
    #[serde(default)]
    results: Vec<HeadwordEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadwordEntry {
    #[serde(default)]
    lexical_entries: Vec<LexicalEntry>,
}

#[derive(Deserialize)]
struct LexicalEntry {
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    senses: Vec<Sense>,
}

#[derive(Deserialize)]
struct Sense {
    #[serde(default)]
    definitions: Vec<String>,
}

/// Turns an API response into a result for `word`.
pub fn classify(endpoint: Endpoint, word: &str, status: StatusCode, body: &str) -> SpellCheckResult {
    match (endpoint, status) {
        (Endpoint::Search, StatusCode::OK) => match serde_json::from_str::<SearchResponse>(body) {
            Ok(response) => match response.results.first() {
                Some(top) if top.word.to_lowercase() == word.to_lowercase() => {
                    SpellCheckResult::correct(word)
                }
                Some(top) => SpellCheckResult::with_suggestion(word, top.word.clone()),
                None => SpellCheckResult::incorrect(word),
            },
            Err(e) => SpellCheckResult::failed(word, format!("Malformed response: {e}")),
        },
        (Endpoint::Entries, StatusCode::OK) => SpellCheckResult {
            definitions: entry_definitions(body),
            ..SpellCheckResult::correct(word)
        },
        (Endpoint::Entries, StatusCode::NOT_FOUND) => SpellCheckResult::incorrect(word),
        (_, status) => SpellCheckResult::unexpected_status(word, status),
    }
}

/// First definition of every sense of the first entry, if the body has them.
fn entry_definitions(body: &str) -> Vec<String> {
    let Ok(response) = serde_json::from_str::<EntryResponse>(body) else {
        return Vec::new();
    };

    response
        .results
        .into_iter()
        .next()
        .and_then(|headword| headword.lexical_entries.into_iter().next())
        .and_then(|lexical| lexical.entries.into_iter().next())
        .map(|entry| {
            entry
                .senses
                .into_iter()
                .filter_map(|sense| sense.definitions.into_iter().next())
                .collect()
        })
        .unwrap_or_default()
}

/// Blocking HTTP client for the dictionary API.
#[derive(Debug, Clone)]
pub struct OracleClient {
    http: Client,
    base_url: Url,
    language: Language,
    endpoint: Endpoint,
    credentials: Credentials,
}

impl OracleClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            language: Language::default(),
            endpoint: Endpoint::default(),
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.credentials().ok_or_else(|| {
            SpellCheckerError::Config("API application ID and key are required".to_string())
        })?;

        Ok(Self::new(credentials)?
            .with_base_url(&config.base_url)?
            .with_language(config.language)
            .with_endpoint(config.endpoint))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// URL queried for `word`. The word is always lowercased.
    pub fn lookup_url(&self, word: &str) -> Result<Url> {
        let word = word.to_lowercase();
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SpellCheckerError::Config(format!("invalid base URL: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            match self.endpoint {
                Endpoint::Search => {
                    segments.push("search").push(self.language.code());
                }
                Endpoint::Entries => {
                    segments.push("entries").push(self.language.code()).push(&word);
                }
            }
        }
        if self.endpoint == Endpoint::Search {
            url.query_pairs_mut()
                .append_pair("q", &word)
                .append_pair("prefix", "false");
        }
        Ok(url)
    }
}

impl SpellingOracle for OracleClient {
    fn check(&self, word: &str) -> Result<SpellCheckResult> {
        let url = self.lookup_url(word)?;
        debug!(%url, word, "querying dictionary");

        let response = self
            .http
            .get(url)
            .header("app_id", &self.credentials.app_id)
            .header("app_key", &self.credentials.app_key)
            .send()?;
        let status = response.status();
        let body = response.text()?;

        let result = classify(self.endpoint, word, status, &body);
        info!(
            word,
            status = status.as_u16(),
            correct = result.is_correct,
            suggestion = result.suggestion.as_deref(),
            "checked word"
        );
        Ok(result)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| SpellCheckerError::Config(format!("invalid base URL '{base_url}': {e}")))
}
