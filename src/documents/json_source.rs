// JSON document source.
//
// Expects a top-level array of objects with an `id` and a `text` field.
// Ids may be strings or numbers. A text that is missing, null, or not a
// string is kept as `None` so a single bad record does not sink the file.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Document, DocumentSet, DocumentSource};

#[derive(Deserialize)]
struct RawDocument {
    id: Value,
    #[serde(default)]
    text: Value,
}

pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse documents from an already-read JSON value.
pub fn documents_from_value(value: Value) -> Result<DocumentSet> {
    let raw: Vec<RawDocument> =
        serde_json::from_value(value).context("Expected a JSON array of {id, text} objects")?;

    let mut docs = Vec::with_capacity(raw.len());
    for (i, item) in raw.into_iter().enumerate() {
        let id = id_to_string(&item.id)
            .with_context(|| format!("Record {i} has a missing or non-scalar id"))?;

        let text = match item.text {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => {
                debug!(id = %id, kind = %json_kind(&other), "Non-string text, treating as empty");
                None
            }
        };
        docs.push(Document { id, text });
    }

    Ok(DocumentSet::new(docs)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl DocumentSource for JsonSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn load(&self) -> Result<DocumentSet> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open JSON file: {}", self.path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse JSON from {}", self.path.display()))?;
        documents_from_value(value)
            .with_context(|| format!("Invalid document set in {}", self.path.display()))
    }
}
