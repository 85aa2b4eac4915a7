// Similarity core: joint TF-IDF vectorization, cosine matrix, top-N ranking.

pub mod matrix;
pub mod ranking;
pub mod sparse;
pub mod vectorizer;
pub mod vocabulary;

pub use matrix::{cosine, similarity, SimilarityMatrix};
pub use ranking::{rank, ComparisonMatches, Match, RankedMatches};
pub use sparse::SparseVector;
pub use vectorizer::{FittedCorpus, TfIdfVectorizer};
pub use vocabulary::Vocabulary;
