// Supported preprocessing languages.
//
// A language selects two resources: the Snowball stemmer from rust-stemmers
// and the stopword list from the stop-words crate. Only languages covered by
// both crates are listed here.

use std::fmt;
use std::str::FromStr;

use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// A language for stopword removal and stemming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    German,
    French,
    Spanish,
    Italian,
    Dutch,
    Portuguese,
    Swedish,
}

impl Language {
    /// Every supported language, in a fixed order.
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Italian,
        Language::Dutch,
        Language::Portuguese,
        Language::Swedish,
    ];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
            Language::Swedish => "sv",
        }
    }

    /// The Snowball stemming algorithm for this language.
    pub fn stemmer_algorithm(&self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::German => Algorithm::German,
            Language::French => Algorithm::French,
            Language::Spanish => Algorithm::Spanish,
            Language::Italian => Algorithm::Italian,
            Language::Dutch => Algorithm::Dutch,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Swedish => Algorithm::Swedish,
        }
    }

    /// The stopword list for this language, lowercased.
    pub fn stopwords(&self) -> Vec<String> {
        use stop_words::{get, LANGUAGE};

        let words: Vec<String> = match self {
            Language::English => get(LANGUAGE::English),
            Language::German => get(LANGUAGE::German),
            Language::French => get(LANGUAGE::French),
            Language::Spanish => get(LANGUAGE::Spanish),
            Language::Italian => get(LANGUAGE::Italian),
            Language::Dutch => get(LANGUAGE::Dutch),
            Language::Portuguese => get(LANGUAGE::Portuguese),
            Language::Swedish => get(LANGUAGE::Swedish),
        };
        words.into_iter().map(|w| w.to_lowercase()).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MatchError;

    /// Accepts an ISO 639-1 code or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code() == wanted || format!("{lang:?}").to_lowercase() == wanted
            })
            .ok_or_else(|| MatchError::invalid(format!("unsupported language '{s}'")))
    }
}
