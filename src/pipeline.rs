// End-to-end matching pipeline.
//
//   documents → Tokenizer (parallel) → joint TF-IDF fit → cosine matrix →
//   top-N ranking
//
// Tokenization of both sets finishes before the vocabulary is fitted; the
// fit needs global document frequencies. Everything after the fit is
// read-only over the fitted vectors.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::{DocumentSet, TokenizedDocument};
use crate::error::{MatchError, Result};
use crate::similarity::{rank, similarity, RankedMatches, TfIdfVectorizer};
use crate::text::{PreprocessingConfig, TextOptions, Tokenizer};

/// Every knob that affects a matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    #[serde(flatten)]
    pub text: TextOptions,
    /// How many baseline matches to keep per comparison document
    pub top_n: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            text: TextOptions::default(),
            top_n: 1,
        }
    }
}

impl MatchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(MatchError::invalid("top_n must be at least 1"));
        }
        self.text.validate()
    }
}

/// Counts and timings from one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub baseline_docs: usize,
    pub comparison_docs: usize,
    /// Baseline documents that produced no tokens (zero vectors)
    pub empty_baseline: usize,
    /// Comparison documents that produced no tokens (zero vectors)
    pub empty_comparison: usize,
    pub vocabulary_size: usize,
    pub elapsed_ms: u128,
}

/// Result of a run: the ranking plus run statistics.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub matches: RankedMatches,
    pub stats: MatchStats,
}

pub struct MatchPipeline {
    tokenizer: Tokenizer,
    vectorizer: TfIdfVectorizer,
    top_n: usize,
    show_progress: bool,
}

impl MatchPipeline {
    /// Validate options and load the language resources.
    pub fn new(options: MatchOptions) -> Result<Self> {
        options.validate()?;
        let config = PreprocessingConfig::new(options.text)?;
        Ok(Self {
            tokenizer: Tokenizer::new(config),
            vectorizer: TfIdfVectorizer::new(),
            top_n: options.top_n,
            show_progress: false,
        })
    }

    /// Draw a progress bar during tokenization (CLI use).
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  Tokenizing [{bar:30}] {pos}/{len} ({eta})")
        {
            pb.set_style(style);
        }
        pb
    }

    fn tokenize(&self, set: &DocumentSet, pb: &ProgressBar) -> Vec<TokenizedDocument> {
        self.tokenizer
            .tokenize_all_with_progress(set.as_slice(), pb)
    }

    /// Run the whole pipeline over a baseline and a comparison set.
    pub fn run(&self, baseline: &DocumentSet, comparison: &DocumentSet) -> Result<MatchReport> {
        let start = Instant::now();

        let pb = self.progress_bar(baseline.len() + comparison.len());
        let baseline_tokens = self.tokenize(baseline, &pb);
        let comparison_tokens = self.tokenize(comparison, &pb);
        pb.finish_and_clear();

        let empty_baseline = baseline_tokens.iter().filter(|d| d.tokens.is_empty()).count();
        let empty_comparison = comparison_tokens
            .iter()
            .filter(|d| d.tokens.is_empty())
            .count();

        info!(
            baseline = baseline.len(),
            comparison = comparison.len(),
            empty_baseline,
            empty_comparison,
            "Tokenized documents"
        );

        let fitted = self
            .vectorizer
            .fit_transform(&baseline_tokens, &comparison_tokens)?;

        let matrix = similarity(&fitted.baseline, &fitted.comparison);
        let matches = rank(&matrix, &baseline.ids(), &comparison.ids(), self.top_n)?;

        let stats = MatchStats {
            baseline_docs: baseline.len(),
            comparison_docs: comparison.len(),
            empty_baseline,
            empty_comparison,
            vocabulary_size: fitted.vocabulary.len(),
            elapsed_ms: start.elapsed().as_millis(),
        };

        info!(
            comparisons = matches.len(),
            top_n = self.top_n,
            elapsed_ms = stats.elapsed_ms as u64,
            "Ranked matches"
        );

        Ok(MatchReport { matches, stats })
    }
}
