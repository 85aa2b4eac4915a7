// CSV export of ranked matches.
//
// One row per comparison document:
//
//   comparison_id, match_1, ..., match_N[, score_1, ..., score_N]
//
// N is the requested top_n. When fewer matches exist (small baseline set)
// the remaining cells are left empty so every row has the same width.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::MatchSink;
use crate::similarity::RankedMatches;

pub struct CsvExport<W: Write> {
    writer: csv::Writer<W>,
    include_scores: bool,
}

impl CsvExport<File> {
    /// Create (or overwrite) a CSV file, making parent directories as needed.
    pub fn create(path: &Path, include_scores: bool) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;
        Ok(Self::from_writer(file, include_scores))
    }
}

impl<W: Write> CsvExport<W> {
    pub fn from_writer(writer: W, include_scores: bool) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            include_scores,
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e.error()))
    }

    fn header(&self, top_n: usize) -> Vec<String> {
        let mut header = vec!["comparison_id".to_string()];
        header.extend((1..=top_n).map(|i| format!("match_{i}")));
        if self.include_scores {
            header.extend((1..=top_n).map(|i| format!("score_{i}")));
        }
        header
    }
}

impl<W: Write> MatchSink for CsvExport<W> {
    fn write(&mut self, matches: &RankedMatches, top_n: usize) -> Result<()> {
        let header = self.header(top_n);
        self.writer.write_record(&header)?;

        for entry in matches {
            let mut row = Vec::with_capacity(header.len());
            row.push(entry.comparison_id.clone());

            let ranked = entry.matches.iter().take(top_n);
            let mut ids: Vec<String> = ranked.clone().map(|m| m.baseline_id.clone()).collect();
            ids.resize(top_n, String::new());
            row.extend(ids);

            if self.include_scores {
                let mut scores: Vec<String> = ranked.map(|m| format!("{:.6}", m.score)).collect();
                scores.resize(top_n, String::new());
                row.extend(scores);
            }

            self.writer
                .write_record(&row)
                .with_context(|| format!("Failed to write row for '{}'", entry.comparison_id))?;
        }

        self.writer.flush()?;
        info!(rows = matches.len(), top_n, "Wrote CSV export");
        Ok(())
    }
}
