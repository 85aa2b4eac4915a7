// TF-IDF vectorization with a jointly fitted vocabulary.
//
// Baseline documents go first, then comparison documents. The vocabulary and
// document frequencies are fitted over that combined list, every document is
// weighted as raw term count × smoothed idf and scaled to unit L2 norm, and
// the vectors are split back into the two groups in input order.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::info;

use super::sparse::SparseVector;
use super::vocabulary::Vocabulary;
use crate::documents::TokenizedDocument;
use crate::error::{MatchError, Result};

/// Output of a joint fit: the shared vocabulary plus both vector groups.
#[derive(Debug, Clone)]
pub struct FittedCorpus {
    pub vocabulary: Vocabulary,
    pub baseline: Vec<SparseVector>,
    pub comparison: Vec<SparseVector>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TfIdfVectorizer;

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self
    }

    /// Fit the vocabulary over both sets and return normalized vectors.
    ///
    /// Fails with `MatchError::EmptyCorpus` if no document in either set has
    /// any tokens.
    pub fn fit_transform(
        &self,
        baseline: &[TokenizedDocument],
        comparison: &[TokenizedDocument],
    ) -> Result<FittedCorpus> {
        let vocabulary = Vocabulary::fit(baseline.iter().chain(comparison));
        if vocabulary.is_empty() {
            return Err(MatchError::EmptyCorpus);
        }

        info!(
            vocabulary = vocabulary.len(),
            documents = vocabulary.n_docs(),
            "Fitted joint vocabulary"
        );

        let baseline = self.transform(&vocabulary, baseline);
        let comparison = self.transform(&vocabulary, comparison);

        Ok(FittedCorpus {
            vocabulary,
            baseline,
            comparison,
        })
    }

    /// Vectorize documents against an already fitted vocabulary. Tokens the
    /// vocabulary does not know are ignored.
    pub fn transform(
        &self,
        vocabulary: &Vocabulary,
        docs: &[TokenizedDocument],
    ) -> Vec<SparseVector> {
        docs.par_iter()
            .map(|doc| weight_document(vocabulary, doc))
            .collect()
    }
}

fn weight_document(vocabulary: &Vocabulary, doc: &TokenizedDocument) -> SparseVector {
    let mut tf: HashMap<usize, usize> = HashMap::new();
    for token in &doc.tokens {
        if let Some(idx) = vocabulary.index_of(token) {
            *tf.entry(idx).or_insert(0) += 1;
        }
    }

    let pairs: Vec<(usize, f64)> = tf
        .into_iter()
        .map(|(idx, count)| (idx, count as f64 * vocabulary.idf(idx)))
        .collect();

    SparseVector::from_pairs(pairs).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, tokens: &[&str]) -> TokenizedDocument {
        TokenizedDocument {
            id: id.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_all_empty_documents_is_an_empty_corpus() {
        let result = TfIdfVectorizer::new().fit_transform(&[doc("a", &[])], &[doc("1", &[])]);
        assert!(matches!(result, Err(MatchError::EmptyCorpus)));
    }

    #[test]
    fn test_vectors_are_unit_norm_or_zero() {
        let fitted = TfIdfVectorizer::new()
            .fit_transform(
                &[doc("a", &["x", "y", "y"]), doc("b", &[])],
                &[doc("1", &["y", "z"])],
            )
            .unwrap();

        assert!((fitted.baseline[0].norm() - 1.0).abs() < 1e-12);
        assert!(fitted.baseline[1].is_zero());
        assert!((fitted.comparison[0].norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_follow_tf_times_idf_before_normalization() {
        // N = 2, "y" in both docs (idf 1), "x" in one (idf ln(3/2) + 1)
        let fitted = TfIdfVectorizer::new()
            .fit_transform(&[doc("a", &["x", "y", "y"])], &[doc("1", &["y"])])
            .unwrap();

        let vocab = &fitted.vocabulary;
        let x = vocab.index_of("x").unwrap();
        let y = vocab.index_of("y").unwrap();

        let wx = (1.5_f64).ln() + 1.0;
        let wy = 2.0;
        let norm = (wx * wx + wy * wy).sqrt();

        let v = &fitted.baseline[0];
        assert!((v.weight_at(x) - wx / norm).abs() < 1e-12);
        assert!((v.weight_at(y) - wy / norm).abs() < 1e-12);
    }

    #[test]
    fn test_output_sizes_match_inputs() {
        let fitted = TfIdfVectorizer::new()
            .fit_transform(
                &[doc("a", &["p"]), doc("b", &["q"]), doc("c", &["r"])],
                &[doc("1", &["p"])],
            )
            .unwrap();
        assert_eq!(fitted.baseline.len(), 3);
        assert_eq!(fitted.comparison.len(), 1);
        assert_eq!(fitted.vocabulary.n_docs(), 4);
    }
}
