// Text → token sequence.
//
// Pipeline per document:
//   lowercase → strip ASCII punctuation (no space substitution) → split on
//   whitespace → unigram branch + n-gram branch → concatenate.
//
// The unigram branch drops stopwords (when enabled) and single-character
// words, then stems. The n-gram branch stems every raw word and keeps
// stopwords, so phrases like "theory of the firm" survive as
// "theori of the" / "of the firm".
//
// Punctuation is removed rather than replaced: "state-of-the-art" becomes
// the single word "stateoftheart". Downstream results depend on this.

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::debug;

use super::preprocess::PreprocessingConfig;
use crate::documents::{Document, TokenizedDocument};

pub struct Tokenizer {
    config: PreprocessingConfig,
}

impl Tokenizer {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Lowercase the text and delete ASCII punctuation in place.
    pub fn normalize(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect()
    }

    /// Unigram branch: stopword filter, length filter, stem.
    pub fn unigrams(&self, words: &[&str]) -> Vec<String> {
        words
            .iter()
            .filter(|w| !(self.config.use_stopwords() && self.config.is_stopword(w)))
            .filter(|w| w.chars().count() >= 2)
            .map(|w| self.config.stem(w))
            .collect()
    }

    /// N-gram branch: stem every word, then emit every contiguous window of
    /// length 2..=n_grams joined by a single space.
    pub fn ngrams(&self, words: &[&str]) -> Vec<String> {
        let stemmed: Vec<String> = words.iter().map(|w| self.config.stem(w)).collect();

        let mut grams = Vec::new();
        for n in 2..=self.config.n_grams() {
            if n > stemmed.len() {
                break;
            }
            grams.extend(stemmed.windows(n).map(|window| window.join(" ")));
        }
        grams
    }

    /// Tokenize one text into unigrams followed by n-grams.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = Self::normalize(text);
        let words: Vec<&str> = normalized.split_whitespace().collect();

        let mut tokens = self.unigrams(&words);
        if self.config.use_ngrams() {
            tokens.extend(self.ngrams(&words));
        }
        tokens
    }

    /// Tokenize a document. Missing text yields an empty token list, which
    /// later becomes the zero vector.
    pub fn tokenize_document(&self, doc: &Document) -> TokenizedDocument {
        let tokens = match doc.text.as_deref() {
            Some(text) => self.tokenize(text),
            None => {
                debug!(id = %doc.id, "Document has no text, producing no tokens");
                Vec::new()
            }
        };
        TokenizedDocument {
            id: doc.id.clone(),
            tokens,
        }
    }

    /// Tokenize many documents in parallel. Output order matches input order.
    pub fn tokenize_all(&self, docs: &[Document]) -> Vec<TokenizedDocument> {
        self.tokenize_all_with_progress(docs, &ProgressBar::hidden())
    }

    /// Same as `tokenize_all`, ticking `progress` once per document.
    pub fn tokenize_all_with_progress(
        &self,
        docs: &[Document],
        progress: &ProgressBar,
    ) -> Vec<TokenizedDocument> {
        docs.par_iter()
            .map(|doc| {
                let tokenized = self.tokenize_document(doc);
                progress.inc(1);
                tokenized
            })
            .collect()
    }
}
