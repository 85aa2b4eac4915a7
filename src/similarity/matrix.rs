// Dense baseline × comparison cosine-similarity matrix.
//
// The vectorizer already hands over unit vectors, but cosine is computed in
// full here so the matrix stays correct for any input. A zero-norm vector
// scores exactly 0 against everything, itself included.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::sparse::SparseVector;

/// Row-major dense matrix: one row per baseline document, one column per
/// comparison document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Similarity of baseline `row` to comparison `col`.
    ///
    /// # Panics
    /// Panics if `row` or `col` is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    /// All similarities for one baseline document.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// All similarities for one comparison document, in baseline order.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.data[r * self.cols + col]).collect()
    }
}

/// Cosine similarity of two sparse vectors, 0.0 if either has zero norm.
pub fn cosine(u: &SparseVector, v: &SparseVector) -> f64 {
    let nu = u.norm();
    let nv = v.norm();
    if nu == 0.0 || nv == 0.0 {
        return 0.0;
    }
    (u.dot(v) / (nu * nv)).clamp(0.0, 1.0)
}

/// Compute the full matrix. Rows are filled in parallel.
pub fn similarity(baseline: &[SparseVector], comparison: &[SparseVector]) -> SimilarityMatrix {
    let rows = baseline.len();
    let cols = comparison.len();

    let row_blocks: Vec<Vec<f64>> = baseline
        .par_iter()
        .map(|b| comparison.iter().map(|c| cosine(b, c)).collect())
        .collect();
    let data = row_blocks.concat();

    SimilarityMatrix { rows, cols, data }
}
