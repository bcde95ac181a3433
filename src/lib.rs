pub mod annotator;
pub mod checker;
pub mod config;
pub mod document;
#[cfg(feature = "gui")]
pub mod gui;
pub mod language;
pub mod oracle;
pub mod reader;

pub use annotator::{annotate, annotate_and_save};
pub use checker::{DocumentAnalysis, SpellChecker};
pub use config::{Config, Credentials};
pub use document::Document;
pub use language::Language;
pub use oracle::{Endpoint, OracleClient, SpellCheckResult, SpellingOracle};
pub use reader::CandidateFilter;

#[derive(Debug, thiserror::Error)]
pub enum SpellCheckerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document has no {0} part")]
    MissingPart(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid word pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Unsupported language: {0}")]
    Language(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SpellCheckerError>;

/// Installs the `tracing` subscriber used by both binaries.
///
/// Honors `RUST_LOG`, falling back to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
