// Database queries: CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Corpus, RunSummary};
use crate::documents::{Document, DocumentSet};
use crate::pipeline::{MatchOptions, MatchStats};
use crate::similarity::{ComparisonMatches, Match, RankedMatches};

// --- Documents ---

/// Current UTC time in the `YYYY-MM-DD HH:MM:SS` form SQLite's own date
/// functions use, so stored times sort and compare as text.
fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Store a document set under `corpus`.
///
/// With `replace`, the corpus is cleared first. Otherwise new documents are
/// appended after the existing ones and documents with a known id get their
/// text updated in place (keeping their original position).
pub fn insert_documents(
    conn: &Connection,
    corpus: Corpus,
    docs: &DocumentSet,
    replace: bool,
) -> Result<usize> {
    let now = timestamp();
    let tx = conn.unchecked_transaction()?;

    if replace {
        tx.execute(
            "DELETE FROM documents WHERE corpus = ?1",
            params![corpus.as_str()],
        )?;
    }

    let next_position: i64 = tx.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM documents WHERE corpus = ?1",
        params![corpus.as_str()],
        |row| row.get(0),
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO documents (corpus, doc_id, position, text, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(corpus, doc_id) DO UPDATE SET
                text = excluded.text,
                imported_at = excluded.imported_at",
        )?;
        for (offset, doc) in docs.iter().enumerate() {
            stmt.execute(params![
                corpus.as_str(),
                doc.id,
                next_position + offset as i64,
                doc.text,
                now,
            ])
            .with_context(|| format!("Failed to store document '{}'", doc.id))?;
        }
    }

    tx.commit()?;
    Ok(docs.len())
}

/// Load every document of a corpus in import order.
pub fn load_documents(conn: &Connection, corpus: Corpus) -> Result<DocumentSet> {
    let mut stmt = conn.prepare(
        "SELECT doc_id, text FROM documents WHERE corpus = ?1 ORDER BY position, doc_id",
    )?;
    let docs = stmt
        .query_map(params![corpus.as_str()], |row| {
            Ok(Document {
                id: row.get(0)?,
                text: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(DocumentSet::new(docs)?)
}

/// Number of stored documents in a corpus.
pub fn count_documents(conn: &Connection, corpus: Corpus) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE corpus = ?1",
        params![corpus.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

// --- Match runs ---

/// Persist a run and its ranked matches. Returns the new run id.
pub fn save_run(
    conn: &Connection,
    options: &MatchOptions,
    stats: &MatchStats,
    matches: &RankedMatches,
) -> Result<i64> {
    let options_json = serde_json::to_string(options)?;
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO match_runs (options_json, baseline_count, comparison_count, vocabulary_size, elapsed_ms, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            options_json,
            stats.baseline_docs as i64,
            stats.comparison_docs as i64,
            stats.vocabulary_size as i64,
            stats.elapsed_ms as i64,
            timestamp(),
        ],
    )?;
    let run_id = tx.last_insert_rowid();

    {
        let mut comparison_stmt = tx.prepare(
            "INSERT INTO run_comparisons (run_id, position, comparison_id) VALUES (?1, ?2, ?3)",
        )?;
        let mut match_stmt = tx.prepare(
            "INSERT INTO ranked_matches (run_id, comparison_id, rank, baseline_id, score)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for (position, entry) in matches.iter().enumerate() {
            comparison_stmt.execute(params![run_id, position as i64, entry.comparison_id])?;
            for (rank, m) in entry.matches.iter().enumerate() {
                match_stmt.execute(params![
                    run_id,
                    entry.comparison_id,
                    rank as i64 + 1,
                    m.baseline_id,
                    m.score,
                ])?;
            }
        }
    }

    tx.commit()?;
    Ok(run_id)
}

/// Summary of the most recent run, if any.
pub fn latest_run(conn: &Connection) -> Result<Option<RunSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, options_json, baseline_count, comparison_count, vocabulary_size, elapsed_ms, created_at
         FROM match_runs ORDER BY id DESC LIMIT 1",
    )?;
    let row = stmt
        .query_row([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .optional()?;

    match row {
        Some((id, options_json, baseline_count, comparison_count, vocabulary_size, elapsed_ms, created_at)) => {
            let options: MatchOptions = serde_json::from_str(&options_json)
                .with_context(|| format!("Run {id} has unreadable options"))?;
            Ok(Some(RunSummary {
                id,
                options,
                baseline_count,
                comparison_count,
                vocabulary_size,
                elapsed_ms,
                created_at,
            }))
        }
        None => Ok(None),
    }
}

/// Load the ranked matches of a run, in the comparison order of that run.
pub fn load_run_matches(conn: &Connection, run_id: i64) -> Result<RankedMatches> {
    let mut comparison_stmt = conn.prepare(
        "SELECT comparison_id FROM run_comparisons WHERE run_id = ?1 ORDER BY position",
    )?;
    let comparison_ids = comparison_stmt
        .query_map(params![run_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut match_stmt = conn.prepare(
        "SELECT baseline_id, score FROM ranked_matches
         WHERE run_id = ?1 AND comparison_id = ?2 ORDER BY rank",
    )?;

    let mut entries = Vec::with_capacity(comparison_ids.len());
    for comparison_id in comparison_ids {
        let matches = match_stmt
            .query_map(params![run_id, comparison_id], |row| {
                Ok(Match {
                    baseline_id: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        entries.push(ComparisonMatches {
            comparison_id,
            matches,
        });
    }

    Ok(RankedMatches::new(entries))
}

/// Total number of stored runs.
pub fn count_runs(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM match_runs", [], |row| row.get(0))?;
    Ok(count)
}
