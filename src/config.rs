use crate::language::Language;
use crate::oracle::{Endpoint, DEFAULT_BASE_URL};
use crate::reader::CandidateFilter;
use crate::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const APP_ID_VAR: &str = "OED_APP_ID";
pub const APP_KEY_VAR: &str = "OED_APP_KEY";
const CONFIG_FILE: &str = "config.json";

/// Dictionary API credentials, sent as the `app_id` and `app_key` headers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app_id: String,
    #[serde(skip_serializing)]
    pub app_key: String,
    pub base_url: String,
    pub language: Language,
    pub endpoint: Endpoint,
    pub candidate_limit: usize,
    pub english_only: bool,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let filter = CandidateFilter::default();
        Self {
            app_id: String::new(),
            app_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: Language::default(),
            endpoint: Endpoint::default(),
            candidate_limit: filter.limit,
            english_only: filter.english_only,
            output_dir: PathBuf::from("."),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("endpoint", &self.endpoint)
            .field("candidate_limit", &self.candidate_limit)
            .field("english_only", &self.english_only)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl Config {
    /// Defaults, then the user config file, then `.env`, then the
    /// `OED_APP_ID` / `OED_APP_KEY` environment variables.
    pub fn load() -> Self {
        load_dotenv();
        Self::load_from(Self::config_path().as_deref(), |name| std::env::var(name).ok())
    }

    /// Layers `path` (if it exists) and `lookup` over the defaults. An
    /// unreadable or malformed file is skipped with a warning.
    pub fn load_from(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring configuration file");
                Self::default()
            }),
            _ => Self::default(),
        };

        config.apply_env(lookup);
        config
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `config.json` in the platform configuration directory.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "SpellCheckPro", "spellcheck-pro")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Overrides the credentials with non-empty values from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(app_id) = lookup(APP_ID_VAR).filter(|v| !v.is_empty()) {
            self.app_id = app_id;
        }
        if let Some(app_key) = lookup(APP_KEY_VAR).filter(|v| !v.is_empty()) {
            self.app_key = app_key;
        }
    }

    /// Present only when both the application ID and key are set.
    pub fn credentials(&self) -> Option<Credentials> {
        let app_id = self.app_id.trim();
        let app_key = self.app_key.trim();
        if app_id.is_empty() || app_key.is_empty() {
            return None;
        }
        Some(Credentials::new(app_id, app_key))
    }

    pub fn candidate_filter(&self) -> CandidateFilter {
        CandidateFilter {
            english_only: self.english_only,
            limit: self.candidate_limit,
        }
    }
}

fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            warn!("failed to load .env file: {err}");
        }
    }
}
