// Core error taxonomy for the similarity pipeline.
//
// The text/similarity core returns these typed errors. Everything above it
// (document sources, sinks, database, CLI) works in anyhow and picks these up
// through `?`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Every document in both sets tokenized to an empty list, so there is
    /// no vocabulary to fit.
    #[error("Empty corpus: no tokens survived preprocessing in either document set")]
    EmptyCorpus,

    /// A caller-supplied argument is out of range or inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl MatchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        MatchError::InvalidArgument(msg.into())
    }
}
