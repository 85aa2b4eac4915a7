// Language detection for the pre-core filter.
//
// Detection is a black box as far as the similarity pipeline is concerned:
// the caller drops documents that are not in the target language before
// tokenization. The trait lets a stronger detector slot in later; the
// bundled one just counts stopword hits per language, which is plenty for
// telling English abstracts from German or French ones.

use std::collections::HashSet;

use tracing::warn;

use super::language::Language;
use crate::documents::DocumentSet;

/// Trait for guessing the language of a piece of text.
pub trait LanguageDetector: Send + Sync {
    /// Best guess for `text`, or `None` when there is not enough signal.
    fn detect(&self, text: &str) -> Option<Language>;
}

/// Picks the candidate language whose stopword list covers the most words.
pub struct StopwordDetector {
    candidates: Vec<(Language, HashSet<String>)>,
    /// Texts with fewer words than this are left undetermined
    min_words: usize,
}

impl StopwordDetector {
    pub fn new(languages: &[Language]) -> Self {
        let candidates = languages
            .iter()
            .map(|&lang| (lang, lang.stopwords().into_iter().collect()))
            .collect();
        Self {
            candidates,
            min_words: 3,
        }
    }

    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }
}

impl Default for StopwordDetector {
    fn default() -> Self {
        Self::new(&Language::ALL)
    }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> Option<Language> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphabetic() && c != '\'')
            .filter(|w| !w.is_empty())
            .collect();

        if words.len() < self.min_words {
            return None;
        }

        // Candidates are scanned in order and only a strictly higher count
        // replaces the leader, so ties go to the earlier language.
        let mut best: Option<(Language, usize)> = None;
        for (lang, stopwords) in &self.candidates {
            let hits = words.iter().filter(|w| stopwords.contains(**w)).count();
            if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
                best = Some((*lang, hits));
            }
        }
        best.map(|(lang, _)| lang)
    }
}

/// Keep only documents detected as `target`. Documents with no text or an
/// undetermined language are dropped too. Returns the filtered set and the
/// number of documents removed.
pub fn filter_by_language(
    set: DocumentSet,
    detector: &dyn LanguageDetector,
    target: Language,
) -> (DocumentSet, usize) {
    let (kept, dropped) = set.partition(|doc| {
        doc.text
            .as_deref()
            .and_then(|text| detector.detect(text))
            .is_some_and(|lang| lang == target)
    });

    if dropped > 0 {
        warn!(
            dropped,
            kept = kept.len(),
            target = %target,
            "Dropped documents not detected as the target language"
        );
    }
    (kept, dropped)
}
