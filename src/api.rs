//! Wire types and client-side validation for the wordbook/settings HTTP API.
//!
//! The backend exposes two read endpoints (`/api/wordbooks`, `/api/settings`) plus
//! a per-wordbook read and two settings writes. Everything here is pure so the
//! payload rules can be checked on the host without a browser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const WORDBOOKS_PATH: &str = "/api/wordbooks";
pub const SETTINGS_PATH: &str = "/api/settings";
pub const SETTINGS_ACCENT_PATH: &str = "/api/settings/accent";
pub const SETTINGS_WORDBOOK_PATH: &str = "/api/settings/wordbook";

// --- Accent -------------------------------------------------------------------

/// Voice accent used for pronunciation. Only two values are accepted by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accent {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
}

impl Accent {
    pub const ALL: [Accent; 2] = [Accent::EnUs, Accent::EnGb];

    /// BCP-47 language tag, also the value persisted by the settings store.
    pub fn code(self) -> &'static str {
        match self {
            Accent::EnUs => "en-US",
            Accent::EnGb => "en-GB",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Accent::EnUs => "American English",
            Accent::EnGb => "British English",
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Accent {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en-US" => Ok(Accent::EnUs),
            "en-GB" => Ok(Accent::EnGb),
            other => Err(ApiError::InvalidAccent(other.to_string())),
        }
    }
}

// --- Payloads -----------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordbookList {
    pub wordbooks: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordbookWords {
    pub name: String,
    pub words: Vec<String>,
}

/// Settings snapshot as returned by `GET /api/settings` and echoed by both PUTs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub wordbook: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accent: Accent::default().code().to_string(),
            wordbook: String::new(),
        }
    }
}

impl Settings {
    /// The persisted accent, falling back to `en-US` when unset or unrecognised.
    pub fn accent(&self) -> Accent {
        if self.accent.trim().is_empty() {
            return Accent::default();
        }
        match self.accent.parse() {
            Ok(accent) => accent,
            Err(err) => {
                log::warn!("ignoring persisted accent: {err}");
                Accent::default()
            }
        }
    }

    /// The last selected wordbook, if any.
    pub fn wordbook(&self) -> Option<&str> {
        let name = self.wordbook.trim();
        (!name.is_empty()).then_some(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentRequest {
    pub accent: Accent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordbookRequest {
    pub wordbook: String,
}

// --- Validation ---------------------------------------------------------------

/// Trim a wordbook name and reject empty names or names with path separators.
pub fn validate_wordbook_name(raw: &str) -> Result<&str, ApiError> {
    let name = raw.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(ApiError::InvalidWordbookName(raw.to_string()));
    }
    Ok(name)
}

/// Lowercase, trim and drop empty entries, preserving order.
pub fn normalize_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

// --- Decoding -----------------------------------------------------------------

pub fn decode_wordbook_list(body: &str) -> Result<Vec<String>, ApiError> {
    let list: WordbookList = serde_json::from_str(body)?;
    Ok(list
        .wordbooks
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && !name.starts_with('.'))
        .collect())
}

pub fn decode_wordbook_words(body: &str) -> Result<WordbookWords, ApiError> {
    let mut book: WordbookWords = serde_json::from_str(body)?;
    book.words = normalize_words(&book.words);
    Ok(book)
}

pub fn decode_settings(body: &str) -> Result<Settings, ApiError> {
    Ok(serde_json::from_str(body)?)
}

pub fn encode_accent(accent: Accent) -> Result<String, ApiError> {
    Ok(serde_json::to_string(&AccentRequest { accent })?)
}

pub fn encode_wordbook(name: &str) -> Result<String, ApiError> {
    let wordbook = validate_wordbook_name(name)?.to_string();
    Ok(serde_json::to_string(&WordbookRequest { wordbook })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_parses_only_known_codes() {
        assert_eq!("en-US".parse::<Accent>().unwrap(), Accent::EnUs);
        assert_eq!(" en-GB ".parse::<Accent>().unwrap(), Accent::EnGb);
        assert!("en-AU".parse::<Accent>().is_err());
        assert!("en-us".parse::<Accent>().is_err());
    }

    #[test]
    fn settings_fall_back_to_default_accent() {
        let s = Settings {
            accent: String::new(),
            wordbook: String::new(),
        };
        assert_eq!(s.accent(), Accent::EnUs);
        assert_eq!(s.wordbook(), None);

        let s = Settings {
            accent: "fr-FR".into(),
            wordbook: " animals ".into(),
        };
        assert_eq!(s.accent(), Accent::EnUs);
        assert_eq!(s.wordbook(), Some("animals"));
    }

    #[test]
    fn wordbook_names_reject_separators() {
        assert_eq!(validate_wordbook_name(" fruit ").unwrap(), "fruit");
        assert!(validate_wordbook_name("").is_err());
        assert!(validate_wordbook_name("   ").is_err());
        assert!(validate_wordbook_name("../etc").is_err());
        assert!(validate_wordbook_name("a\\b").is_err());
    }

    #[test]
    fn accent_request_uses_wire_codes() {
        assert_eq!(encode_accent(Accent::EnGb).unwrap(), r#"{"accent":"en-GB"}"#);
    }
}
