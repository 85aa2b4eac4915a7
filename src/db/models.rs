// Data models: Rust types that map to database rows.
//
// Kept apart from the queries so callers can name a corpus or read a run
// summary without depending on rusqlite directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::pipeline::MatchOptions;

/// Which side of the comparison a stored document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corpus {
    Baseline,
    Comparison,
}

impl Corpus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Corpus::Baseline => "baseline",
            Corpus::Comparison => "comparison",
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corpus {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Ok(Corpus::Baseline),
            "comparison" => Ok(Corpus::Comparison),
            other => Err(MatchError::invalid(format!(
                "unknown corpus '{other}' (expected baseline or comparison)"
            ))),
        }
    }
}

/// One stored matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: i64,
    pub options: MatchOptions,
    pub baseline_count: u32,
    pub comparison_count: u32,
    pub vocabulary_size: u32,
    /// Wall-clock time of the run
    pub elapsed_ms: i64,
    pub created_at: String,
}
