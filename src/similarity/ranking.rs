// Top-N ranking of baseline documents for each comparison document.
//
// Ordering is by descending similarity, with ties going to the smaller
// original baseline index. Comparison entries keep their input order, so
// the whole result is a pure function of the matrix and the id lists.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::matrix::SimilarityMatrix;
use crate::error::{MatchError, Result};

/// One ranked baseline match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub baseline_id: String,
    pub score: f64,
}

/// The ranked matches for a single comparison document, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatches {
    pub comparison_id: String,
    pub matches: Vec<Match>,
}

/// Ranked matches for every comparison document, in comparison input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedMatches {
    entries: Vec<ComparisonMatches>,
}

impl RankedMatches {
    pub fn new(entries: Vec<ComparisonMatches>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComparisonMatches> {
        self.entries.iter()
    }

    /// Matches for one comparison id.
    pub fn get(&self, comparison_id: &str) -> Option<&[Match]> {
        self.entries
            .iter()
            .find(|e| e.comparison_id == comparison_id)
            .map(|e| e.matches.as_slice())
    }

    /// Ranked baseline ids for one comparison id.
    pub fn baseline_ids(&self, comparison_id: &str) -> Option<Vec<&str>> {
        self.get(comparison_id)
            .map(|ms| ms.iter().map(|m| m.baseline_id.as_str()).collect())
    }

    /// Plain comparison id → ranked baseline ids mapping.
    pub fn to_id_map(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.comparison_id.clone(),
                    e.matches.iter().map(|m| m.baseline_id.clone()).collect(),
                )
            })
            .collect()
    }

    /// Longest match list across all entries.
    pub fn max_matches(&self) -> usize {
        self.entries.iter().map(|e| e.matches.len()).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a RankedMatches {
    type Item = &'a ComparisonMatches;
    type IntoIter = std::slice::Iter<'a, ComparisonMatches>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Baseline indices for one column, best first, at most `top_n` of them.
fn top_indices(column: &[f64], top_n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..column.len()).collect();
    order.sort_by(|&a, &b| column[b].total_cmp(&column[a]).then(a.cmp(&b)));
    order.truncate(top_n);
    order
}

/// Rank the top `top_n` baseline documents for every comparison document.
///
/// `top_n` larger than the baseline set is clamped. An empty baseline set
/// gives every comparison id an empty list.
pub fn rank(
    matrix: &SimilarityMatrix,
    baseline_ids: &[String],
    comparison_ids: &[String],
    top_n: usize,
) -> Result<RankedMatches> {
    if top_n == 0 {
        return Err(MatchError::invalid("top_n must be at least 1"));
    }
    if baseline_ids.len() != matrix.rows() {
        return Err(MatchError::invalid(format!(
            "{} baseline ids for a matrix with {} rows",
            baseline_ids.len(),
            matrix.rows()
        )));
    }
    if comparison_ids.len() != matrix.cols() {
        return Err(MatchError::invalid(format!(
            "{} comparison ids for a matrix with {} columns",
            comparison_ids.len(),
            matrix.cols()
        )));
    }

    let entries: Vec<ComparisonMatches> = comparison_ids
        .par_iter()
        .enumerate()
        .map(|(col, comparison_id)| {
            let column = matrix.column(col);
            let matches = top_indices(&column, top_n)
                .into_iter()
                .map(|row| Match {
                    baseline_id: baseline_ids[row].clone(),
                    score: column[row],
                })
                .collect();
            ComparisonMatches {
                comparison_id: comparison_id.clone(),
                matches,
            }
        })
        .collect();

    Ok(RankedMatches::new(entries))
}
