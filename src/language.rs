use serde::{Deserialize, Serialize};

/// Source languages served by the Oxford Dictionaries API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-gb")]
    EnglishGb,
    #[serde(rename = "en-us")]
    EnglishUs,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "lv")]
    Latvian,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "sw")]
    Swahili,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "gu")]
    Gujarati,
}

impl Language {
    pub fn all() -> Vec<Language> {
        vec![
            Language::EnglishGb,
            Language::EnglishUs,
            Language::Spanish,
            Language::Latvian,
            Language::Hindi,
            Language::Swahili,
            Language::Tamil,
            Language::Gujarati,
        ]
    }

    /// Code used in the API path, e.g. `entries/en-gb/apple`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::EnglishGb => "en-gb",
            Language::EnglishUs => "en-us",
            Language::Spanish => "es",
            Language::Latvian => "lv",
            Language::Hindi => "hi",
            Language::Swahili => "sw",
            Language::Tamil => "ta",
            Language::Gujarati => "gu",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::EnglishGb => "English (UK)",
            Language::EnglishUs => "English (US)",
            Language::Spanish => "Spanish",
            Language::Latvian => "Latvian",
            Language::Hindi => "Hindi",
            Language::Swahili => "Swahili",
            Language::Tamil => "Tamil",
            Language::Gujarati => "Gujarati",
        }
    }

    pub fn flag_emoji(&self) -> &'static str {
        match self {
            Language::EnglishGb => "🇬🇧",
            Language::EnglishUs => "🇺🇸",
            Language::Spanish => "🇪🇸",
            Language::Latvian => "🇱🇻",
            Language::Hindi | Language::Tamil | Language::Gujarati => "🇮🇳",
            Language::Swahili => "🇰🇪",
        }
    }

    pub fn from_code(code: &str) -> crate::Result<Self> {
        match code.trim().to_lowercase().replace('_', "-").as_str() {
            "en-gb" | "en" | "eng" => Ok(Language::EnglishGb),
            "en-us" => Ok(Language::EnglishUs),
            "es" | "spa" => Ok(Language::Spanish),
            "lv" | "lav" => Ok(Language::Latvian),
            "hi" | "hin" => Ok(Language::Hindi),
            "sw" | "swa" => Ok(Language::Swahili),
            "ta" | "tam" => Ok(Language::Tamil),
            "gu" | "guj" => Ok(Language::Gujarati),
            other => Err(crate::SpellCheckerError::Language(other.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
