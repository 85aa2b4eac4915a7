// Database layer: SQLite storage for imported documents and match runs.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever PANELMATCH_DB_PATH points
// (defaults to ./panelmatch.db).

pub mod models;
pub mod queries;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

use crate::documents::{DocumentSet, DocumentSource};
use crate::output::MatchSink;
use crate::pipeline::{MatchOptions, MatchStats};
use crate::similarity::RankedMatches;

pub use models::{Corpus, RunSummary};

/// Open (or create) the database and run migrations.
///
/// This is the main entry point, called by `panelmatch init` and by any
/// command that writes to the database.
pub fn initialize(db_path: &str) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // Run schema creation / migrations
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing database (fails if it doesn't exist yet).
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `panelmatch init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // Bring older databases up to the current schema
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Owned connection with document and run helpers on top of `queries`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create the database if needed and open it.
    pub fn initialize(db_path: &str) -> Result<Self> {
        Ok(Self::new(initialize(db_path)?))
    }

    /// Open an existing database.
    pub fn open(db_path: &str) -> Result<Self> {
        Ok(Self::new(open(db_path)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn table_count(&self) -> Result<i64> {
        schema::table_count(&self.conn)
    }

    pub fn import(&self, corpus: Corpus, docs: &DocumentSet, replace: bool) -> Result<usize> {
        let stored = queries::insert_documents(&self.conn, corpus, docs, replace)?;
        info!(corpus = %corpus, stored, replace, "Imported documents");
        Ok(stored)
    }

    pub fn count_documents(&self, corpus: Corpus) -> Result<i64> {
        queries::count_documents(&self.conn, corpus)
    }

    pub fn latest_run(&self) -> Result<Option<RunSummary>> {
        queries::latest_run(&self.conn)
    }

    pub fn run_matches(&self, run_id: i64) -> Result<RankedMatches> {
        queries::load_run_matches(&self.conn, run_id)
    }

    /// The most recent run together with its ranked matches.
    pub fn latest_matches(&self) -> Result<Option<(RunSummary, RankedMatches)>> {
        match self.latest_run()? {
            Some(run) => {
                let matches = self.run_matches(run.id)?;
                Ok(Some((run, matches)))
            }
            None => Ok(None),
        }
    }

    pub fn count_runs(&self) -> Result<i64> {
        queries::count_runs(&self.conn)
    }

    /// A document source reading one corpus from this database.
    pub fn source(&self, corpus: Corpus) -> SqliteSource<'_> {
        SqliteSource {
            conn: &self.conn,
            corpus,
        }
    }

    /// A result sink recording a run with the given options and stats.
    pub fn sink(&self, options: MatchOptions, stats: MatchStats) -> SqliteSink<'_> {
        SqliteSink {
            conn: &self.conn,
            options,
            stats,
            run_id: None,
        }
    }
}

/// Reads a stored corpus in import order.
pub struct SqliteSource<'a> {
    conn: &'a Connection,
    corpus: Corpus,
}

impl DocumentSource for SqliteSource<'_> {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.corpus)
    }

    fn load(&self) -> Result<DocumentSet> {
        queries::load_documents(self.conn, self.corpus)
            .with_context(|| format!("Failed to load {} documents from the database", self.corpus))
    }
}

/// Writes ranked matches as a new run.
pub struct SqliteSink<'a> {
    conn: &'a Connection,
    options: MatchOptions,
    stats: MatchStats,
    run_id: Option<i64>,
}

impl SqliteSink<'_> {
    /// Id of the run written by the last `write` call.
    pub fn run_id(&self) -> Option<i64> {
        self.run_id
    }
}

impl MatchSink for SqliteSink<'_> {
    fn write(&mut self, matches: &RankedMatches, top_n: usize) -> Result<()> {
        let options = MatchOptions {
            top_n,
            ..self.options
        };
        let run_id = queries::save_run(self.conn, &options, &self.stats, matches)?;
        info!(run_id, comparisons = matches.len(), "Saved match run");
        self.run_id = Some(run_id);
        Ok(())
    }
}
