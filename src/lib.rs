// Panelmatch: rank comparison documents against a baseline corpus
//
// This is the library root. The core is `text` (tokenization) and
// `similarity` (joint TF-IDF, cosine matrix, ranking); `pipeline` chains
// them. `documents`, `output`, and `db` are the collaborators that feed
// documents in and carry rankings out.

pub mod config;
pub mod documents;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod similarity;
pub mod text;

#[cfg(feature = "sqlite")]
pub mod db;
#[cfg(feature = "sqlite")]
pub mod status;

pub use documents::{Document, DocumentSet, DocumentSource, TokenizedDocument};
pub use error::{MatchError, Result};
pub use pipeline::{MatchOptions, MatchPipeline, MatchReport, MatchStats};
pub use similarity::RankedMatches;
