// Immutable preprocessing configuration.
//
// Built once per run and handed to the Tokenizer. The stopword set and the
// stemmer live here rather than in any global, so two runs with different
// languages or flags can coexist in one process.

use std::collections::HashSet;
use std::fmt;

use rust_stemmers::Stemmer;
use serde::{Deserialize, Serialize};

use super::language::Language;
use crate::error::{MatchError, Result};

/// Plain, serializable text options. This is the user-facing configuration
/// surface; `PreprocessingConfig` is the validated, ready-to-use form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Drop stopwords from the unigram branch
    pub use_stopwords: bool,
    /// Emit n-gram tokens alongside unigrams
    pub use_ngrams: bool,
    /// Longest n-gram window (windows of 2..=n_grams are emitted)
    pub n_grams: usize,
    /// Stopword list and stemmer language
    pub language: Language,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            use_stopwords: true,
            use_ngrams: true,
            n_grams: 3,
            language: Language::English,
        }
    }
}

impl TextOptions {
    /// Check option ranges. `n_grams` only matters when n-grams are enabled.
    pub fn validate(&self) -> Result<()> {
        if self.use_ngrams && self.n_grams < 2 {
            return Err(MatchError::invalid(format!(
                "n_grams must be at least 2 when n-grams are enabled, got {}",
                self.n_grams
            )));
        }
        Ok(())
    }
}

/// Validated preprocessing state: flags plus the loaded stopword set and
/// stemmer for the chosen language.
pub struct PreprocessingConfig {
    options: TextOptions,
    stopwords: HashSet<String>,
    stemmer: Stemmer,
}

impl PreprocessingConfig {
    pub fn new(options: TextOptions) -> Result<Self> {
        options.validate()?;

        // The set is only consulted when stopword removal is on, but loading
        // it unconditionally keeps `is_stopword` meaningful for callers.
        let stopwords: HashSet<String> = options.language.stopwords().into_iter().collect();
        let stemmer = Stemmer::create(options.language.stemmer_algorithm());

        Ok(Self {
            options,
            stopwords,
            stemmer,
        })
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    pub fn language(&self) -> Language {
        self.options.language
    }

    pub fn use_stopwords(&self) -> bool {
        self.options.use_stopwords
    }

    pub fn use_ngrams(&self) -> bool {
        self.options.use_ngrams
    }

    pub fn n_grams(&self) -> usize {
        self.options.n_grams
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }
}

impl fmt::Debug for PreprocessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessingConfig")
            .field("options", &self.options)
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}
