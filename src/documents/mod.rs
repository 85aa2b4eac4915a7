// Document types and the document-source seam.
//
// A document is an opaque id plus text. Baseline and comparison sets are
// separate id spaces, so the same id may appear once in each. Text is
// optional: a source that hits a NULL cell or a non-string value records
// `None` and the tokenizer turns it into an empty token list.

pub mod csv_source;
pub mod json_source;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

pub use csv_source::CsvSource;
pub use json_source::JsonSource;

/// A single input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
        }
    }

    /// A document whose text is missing or unreadable.
    pub fn without_text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
        }
    }
}

/// A document after tokenization. Token order carries no meaning but
/// multiplicity does, so the list is never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedDocument {
    pub id: String,
    pub tokens: Vec<String>,
}

/// An ordered collection of documents with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    docs: Vec<Document>,
}

impl DocumentSet {
    /// Wrap a list of documents, rejecting duplicate ids.
    pub fn new(docs: Vec<Document>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(docs.len());
        for doc in &docs {
            if !seen.insert(doc.id.as_str()) {
                return Err(MatchError::invalid(format!(
                    "duplicate document id '{}'",
                    doc.id
                )));
            }
        }
        Ok(Self { docs })
    }

    /// Build a set from parallel id and text columns, as handed over by a
    /// tabular source.
    pub fn from_columns(ids: Vec<String>, texts: Vec<Option<String>>) -> Result<Self> {
        if ids.len() != texts.len() {
            return Err(MatchError::invalid(format!(
                "id and text columns differ in length ({} ids, {} texts)",
                ids.len(),
                texts.len()
            )));
        }
        let docs = ids
            .into_iter()
            .zip(texts)
            .map(|(id, text)| Document { id, text })
            .collect();
        Self::new(docs)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.docs
    }

    pub fn ids(&self) -> Vec<String> {
        self.docs.iter().map(|d| d.id.clone()).collect()
    }

    /// Split off the documents that fail `keep`. Returns the surviving set
    /// (order preserved) and the number of documents removed.
    pub fn partition<F>(self, mut keep: F) -> (Self, usize)
    where
        F: FnMut(&Document) -> bool,
    {
        let before = self.docs.len();
        let docs: Vec<Document> = self.docs.into_iter().filter(|d| keep(d)).collect();
        let dropped = before - docs.len();
        (Self { docs }, dropped)
    }

    pub fn into_inner(self) -> Vec<Document> {
        self.docs
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

/// Anything that can hand over a fully materialized document set.
///
/// Implementations: `CsvSource`, `JsonSource`, and (with the `sqlite`
/// feature) `db::SqliteSource`.
pub trait DocumentSource {
    /// Short human-readable description, used in log lines.
    fn describe(&self) -> String;

    /// Load every document, in source order.
    fn load(&self) -> anyhow::Result<DocumentSet>;
}
