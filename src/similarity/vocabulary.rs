// Joint vocabulary over the baseline and comparison corpora.
//
// Fitting on both sets together gives them one shared index space and one
// set of document frequencies, which is what makes a baseline vector and a
// comparison vector comparable at all. Indices follow lexicographic token
// order, so they depend only on the token set and not on document order.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::documents::TokenizedDocument;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    /// Document frequency per index
    doc_freq: Vec<usize>,
    /// Number of documents the vocabulary was fitted on
    n_docs: usize,
}

impl Vocabulary {
    /// Fit over every document in `docs`.
    pub fn fit<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = &'a TokenizedDocument>,
    {
        let mut df: BTreeMap<&'a str, usize> = BTreeMap::new();
        let mut n_docs = 0;

        for doc in docs {
            n_docs += 1;
            let distinct: HashSet<&str> = doc.tokens.iter().map(String::as_str).collect();
            for token in distinct {
                *df.entry(token).or_insert(0) += 1;
            }
        }

        let mut index = HashMap::with_capacity(df.len());
        let mut doc_freq = Vec::with_capacity(df.len());
        for (i, (token, count)) in df.into_iter().enumerate() {
            index.insert(token.to_string(), i);
            doc_freq.push(count);
        }

        Self {
            index,
            doc_freq,
            n_docs,
        }
    }

    pub fn len(&self) -> usize {
        self.doc_freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_freq.is_empty()
    }

    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn doc_freq(&self, index: usize) -> usize {
        self.doc_freq.get(index).copied().unwrap_or(0)
    }

    /// Smoothed inverse document frequency:
    /// `ln((1 + N) / (1 + df)) + 1`, always > 0.
    pub fn idf(&self, index: usize) -> f64 {
        let n = self.n_docs as f64;
        let df = self.doc_freq(index) as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }
}
