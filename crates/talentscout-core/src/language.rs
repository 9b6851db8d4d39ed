//! Display languages supported at the translation boundary.
//!
//! The stage machine always works in English. Other languages are converted
//! on the way in and out by a translator collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported language '{0}': expected one of en, ta, hi")]
pub struct UnsupportedLanguage(pub String);

/// A language the candidate can converse in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Tamil,
    Hindi,
}

impl Language {
    /// Language the stage machine reads and writes.
    pub const WORKING: Language = Language::English;

    pub const ALL: [Language; 3] = [Language::English, Language::Tamil, Language::Hindi];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Tamil => "ta",
            Language::Hindi => "hi",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tamil => "Tamil",
            Language::Hindi => "Hindi",
        }
    }

    /// Whether text in this language must pass through a translator.
    pub fn needs_translation(self) -> bool {
        self != Self::WORKING
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    /// Accepts either the ISO code or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == wanted || l.display_name().to_lowercase() == wanted)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}
