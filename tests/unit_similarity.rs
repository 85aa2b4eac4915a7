// Unit tests for the similarity core.
//
// Exercises SparseVector arithmetic, Vocabulary fitting and idf, the TF-IDF
// vectorizer, the cosine matrix, and top-N ranking with its tie-break and
// clamping rules.

use panelmatch::similarity::{
    cosine, rank, similarity, SparseVector, TfIdfVectorizer, Vocabulary,
};
use panelmatch::{MatchError, TokenizedDocument};

fn doc(id: &str, tokens: &[&str]) -> TokenizedDocument {
    TokenizedDocument {
        id: id.to_string(),
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
    }
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// SparseVector
// ============================================================

#[test]
fn from_pairs_merges_duplicates_and_drops_zeros() {
    let v = SparseVector::from_pairs(vec![(3, 1.0), (1, 2.0), (3, 0.5), (7, 0.0)]);
    assert_eq!(v.indices(), &[1, 3]);
    assert_eq!(v.values(), &[2.0, 1.5]);
    assert_eq!(v.weight_at(7), 0.0);
}

#[test]
fn dot_only_counts_shared_indices() {
    let a = SparseVector::from_pairs(vec![(0, 1.0), (2, 3.0)]);
    let b = SparseVector::from_pairs(vec![(1, 5.0), (2, 2.0)]);
    assert!((a.dot(&b) - 6.0).abs() < 1e-12);
    assert!((a.dot(&b) - b.dot(&a)).abs() < 1e-12);
}

#[test]
fn normalizing_zero_vector_leaves_it_zero() {
    let v = SparseVector::zero().normalized();
    assert!(v.is_zero());
    assert_eq!(v.norm(), 0.0);
}

// ============================================================
// Vocabulary
// ============================================================

#[test]
fn vocabulary_indices_are_lexicographic() {
    let docs = [doc("a", &["zebra", "apple"]), doc("b", &["mango"])];
    let vocab = Vocabulary::fit(docs.iter());
    assert_eq!(vocab.index_of("apple"), Some(0));
    assert_eq!(vocab.index_of("mango"), Some(1));
    assert_eq!(vocab.index_of("zebra"), Some(2));
    assert_eq!(vocab.index_of("kiwi"), None);
}

#[test]
fn document_frequency_counts_each_document_once() {
    let docs = [doc("a", &["x", "x", "x"]), doc("b", &["x"]), doc("c", &["y"])];
    let vocab = Vocabulary::fit(docs.iter());
    let x = vocab.index_of("x").unwrap();
    assert_eq!(vocab.doc_freq(x), 2);
    assert_eq!(vocab.n_docs(), 3);
}

#[test]
fn smoothed_idf_formula() {
    // idf = ln((1 + N) / (1 + df)) + 1
    let docs = [doc("a", &["x", "y"]), doc("b", &["x"]), doc("c", &["z"])];
    let vocab = Vocabulary::fit(docs.iter());
    let x = vocab.index_of("x").unwrap();
    let y = vocab.index_of("y").unwrap();
    assert!((vocab.idf(x) - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
    assert!((vocab.idf(y) - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
}

#[test]
fn term_in_every_document_still_has_positive_idf() {
    let docs = [doc("a", &["x"]), doc("b", &["x"])];
    let vocab = Vocabulary::fit(docs.iter());
    assert!((vocab.idf(0) - 1.0).abs() < 1e-12);
}

// ============================================================
// TfIdfVectorizer
// ============================================================

#[test]
fn vectorizer_rejects_corpus_without_tokens() {
    let result = TfIdfVectorizer::new().fit_transform(&[doc("a", &[])], &[]);
    assert!(matches!(result, Err(MatchError::EmptyCorpus)));
}

#[test]
fn comparison_only_tokens_enter_the_vocabulary() {
    let fitted = TfIdfVectorizer::new()
        .fit_transform(&[doc("a", &["x"])], &[doc("1", &["y"])])
        .unwrap();
    assert_eq!(fitted.vocabulary.len(), 2);
    assert_eq!(fitted.vocabulary.n_docs(), 2);
    assert!(!fitted.comparison[0].is_zero());
}

#[test]
fn vectors_keep_input_order_and_unit_norm() {
    let baseline = [doc("a", &["x"]), doc("b", &[]), doc("c", &["y", "y", "x"])];
    let comparison = [doc("1", &["y"]), doc("2", &["x", "z"])];
    let fitted = TfIdfVectorizer::new()
        .fit_transform(&baseline, &comparison)
        .unwrap();

    assert_eq!(fitted.baseline.len(), 3);
    assert_eq!(fitted.comparison.len(), 2);
    assert!(fitted.baseline[1].is_zero());
    for v in fitted.baseline.iter().chain(&fitted.comparison) {
        if !v.is_zero() {
            assert!((v.norm() - 1.0).abs() < 1e-9);
        }
    }
    // "a" only holds x, so its vector has a single entry
    assert_eq!(fitted.baseline[0].nnz(), 1);
}

#[test]
fn term_frequency_raises_weight() {
    let fitted = TfIdfVectorizer::new()
        .fit_transform(&[doc("a", &["x", "x", "y"])], &[doc("1", &["z"])])
        .unwrap();
    let v = &fitted.baseline[0];
    let x = fitted.vocabulary.index_of("x").unwrap();
    let y = fitted.vocabulary.index_of("y").unwrap();
    // Same idf, so weights scale with raw counts
    assert!((v.weight_at(x) / v.weight_at(y) - 2.0).abs() < 1e-9);
}

// ============================================================
// Cosine matrix
// ============================================================

#[test]
fn cosine_of_zero_vector_is_zero() {
    let u = SparseVector::from_pairs(vec![(0, 1.0)]);
    assert_eq!(cosine(&u, &SparseVector::zero()), 0.0);
    assert_eq!(cosine(&SparseVector::zero(), &SparseVector::zero()), 0.0);
}

#[test]
fn matrix_shape_and_values() {
    let b = vec![
        SparseVector::from_pairs(vec![(0, 1.0)]),
        SparseVector::from_pairs(vec![(1, 1.0)]),
        SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0)]).normalized(),
    ];
    let c = vec![SparseVector::from_pairs(vec![(0, 1.0)])];
    let m = similarity(&b, &c);

    assert_eq!(m.rows(), 3);
    assert_eq!(m.cols(), 1);
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert_eq!(m.get(1, 0), 0.0);
    assert!((m.get(2, 0) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn matrix_entries_stay_in_unit_interval() {
    let b = vec![
        SparseVector::from_pairs(vec![(0, 3.0), (2, 4.0)]),
        SparseVector::from_pairs(vec![(1, 0.1)]),
    ];
    let c = vec![
        SparseVector::from_pairs(vec![(0, 3.0), (2, 4.0)]),
        SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0), (2, 1.0)]),
    ];
    let m = similarity(&b, &c);
    for r in 0..m.rows() {
        for &s in m.row(r) {
            assert!((0.0..=1.0).contains(&s));
        }
    }
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
}

// ============================================================
// Ranking
// ============================================================

#[test]
fn rank_orders_by_descending_score() {
    let b = vec![
        SparseVector::from_pairs(vec![(1, 1.0)]),
        SparseVector::from_pairs(vec![(0, 1.0)]),
        SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0)]).normalized(),
    ];
    let c = vec![SparseVector::from_pairs(vec![(0, 1.0)])];
    let m = similarity(&b, &c);

    let ranked = rank(&m, &ids(&["p", "q", "r"]), &ids(&["1"]), 3).unwrap();
    assert_eq!(ranked.baseline_ids("1").unwrap(), vec!["q", "r", "p"]);
}

#[test]
fn ties_broken_by_baseline_input_order() {
    let v = SparseVector::from_pairs(vec![(0, 1.0)]);
    let b = vec![v.clone(), v.clone(), v.clone()];
    let m = similarity(&b, &[v]);

    for _ in 0..5 {
        let ranked = rank(&m, &ids(&["c", "a", "b"]), &ids(&["1"]), 2).unwrap();
        assert_eq!(ranked.baseline_ids("1").unwrap(), vec!["c", "a"]);
    }
}

#[test]
fn top_n_clamped_to_baseline_size() {
    let v = SparseVector::from_pairs(vec![(0, 1.0)]);
    let m = similarity(&[v.clone(), v.clone()], &[v]);
    let ranked = rank(&m, &ids(&["a", "b"]), &ids(&["1"]), 10).unwrap();
    assert_eq!(ranked.get("1").unwrap().len(), 2);
}

#[test]
fn zero_top_n_is_invalid() {
    let v = SparseVector::from_pairs(vec![(0, 1.0)]);
    let m = similarity(&[v.clone()], &[v]);
    let result = rank(&m, &ids(&["a"]), &ids(&["1"]), 0);
    assert!(matches!(result, Err(MatchError::InvalidArgument(_))));
}

#[test]
fn empty_baseline_gives_empty_lists() {
    let c = vec![SparseVector::from_pairs(vec![(0, 1.0)])];
    let m = similarity(&[], &c);
    let ranked = rank(&m, &[], &ids(&["1"]), 3).unwrap();
    assert_eq!(ranked.len(), 1);
    assert!(ranked.get("1").unwrap().is_empty());
}

#[test]
fn mismatched_id_lengths_rejected() {
    let v = SparseVector::from_pairs(vec![(0, 1.0)]);
    let m = similarity(&[v.clone()], &[v]);
    let result = rank(&m, &ids(&["a", "b"]), &ids(&["1"]), 1);
    assert!(matches!(result, Err(MatchError::InvalidArgument(_))));
}
