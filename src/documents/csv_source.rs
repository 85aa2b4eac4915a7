// CSV document source.
//
// Reads a headered CSV file. One column supplies the id; one or more columns
// are joined (single space, empty cells skipped) to form the text. This is
// how a title + abstract pair becomes one document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::{DocumentSet, DocumentSource};

pub struct CsvSource {
    path: PathBuf,
    id_column: String,
    text_columns: Vec<String>,
}

impl CsvSource {
    pub fn new(
        path: impl Into<PathBuf>,
        id_column: impl Into<String>,
        text_columns: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            id_column: id_column.into(),
            text_columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Position of `name` in the header row, or a helpful error listing what
/// columns do exist.
fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers.iter().position(|h| h.trim() == name).with_context(|| {
        let available: Vec<&str> = headers.iter().collect();
        format!(
            "Column '{name}' not found in {} (available: {})",
            path.display(),
            available.join(", ")
        )
    })
}

impl DocumentSource for CsvSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load(&self) -> Result<DocumentSet> {
        if self.text_columns.is_empty() {
            anyhow::bail!("At least one text column is required to read {}", self.path.display());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open CSV file: {}", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read CSV header from {}", self.path.display()))?
            .clone();

        let id_idx = column_index(&headers, &self.id_column, &self.path)?;
        let text_idx: Vec<usize> = self
            .text_columns
            .iter()
            .map(|name| column_index(&headers, name, &self.path))
            .collect::<Result<_>>()?;

        let mut ids = Vec::new();
        let mut texts = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("Malformed CSV row {} in {}", row + 2, self.path.display())
            })?;

            let id = record.get(id_idx).unwrap_or("").trim().to_string();
            if id.is_empty() {
                anyhow::bail!(
                    "Empty id in row {} of {}",
                    row + 2,
                    self.path.display()
                );
            }

            let parts: Vec<&str> = text_idx
                .iter()
                .filter_map(|&i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();

            let text = if parts.is_empty() {
                debug!(id = %id, "CSV row has no text, keeping it as an empty document");
                None
            } else {
                Some(parts.join(" "))
            };

            ids.push(id);
            texts.push(text);
        }

        let set = DocumentSet::from_columns(ids, texts)
            .with_context(|| format!("Invalid document set in {}", self.path.display()))?;
        Ok(set)
    }
}
