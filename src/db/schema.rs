// Database schema: table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent and safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Imported documents for both corpora
        CREATE TABLE IF NOT EXISTS documents (
            corpus TEXT NOT NULL CHECK (corpus IN ('baseline', 'comparison')),
            doc_id TEXT NOT NULL,
            position INTEGER NOT NULL,         -- input order within the corpus
            text TEXT,                         -- NULL when the source had no usable text
            imported_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (corpus, doc_id)
        );

        -- One row per matching run
        CREATE TABLE IF NOT EXISTS match_runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            options_json TEXT NOT NULL,        -- MatchOptions as JSON
            baseline_count INTEGER NOT NULL,
            comparison_count INTEGER NOT NULL,
            vocabulary_size INTEGER NOT NULL,
            elapsed_ms INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Every comparison document in a run, so ids with no matches survive
        CREATE TABLE IF NOT EXISTS run_comparisons (
            run_id INTEGER NOT NULL REFERENCES match_runs(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            comparison_id TEXT NOT NULL,
            PRIMARY KEY (run_id, position)
        );

        -- Ranked baseline matches per comparison document
        CREATE TABLE IF NOT EXISTS ranked_matches (
            run_id INTEGER NOT NULL REFERENCES match_runs(id) ON DELETE CASCADE,
            comparison_id TEXT NOT NULL,
            rank INTEGER NOT NULL,             -- 1 = best
            baseline_id TEXT NOT NULL,
            score REAL NOT NULL,               -- cosine similarity, 0.0 to 1.0
            PRIMARY KEY (run_id, comparison_id, rank)
        );

        -- Index for reading a corpus back in input order
        CREATE INDEX IF NOT EXISTS idx_documents_position
            ON documents(corpus, position);

        -- Index for finding which comparisons a baseline document matched
        CREATE INDEX IF NOT EXISTS idx_matches_baseline
            ON ranked_matches(baseline_id);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
///
/// No migrations exist past v1 yet; the first schema change goes through here.
#[allow(dead_code)]
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of user-created tables in the database.
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
