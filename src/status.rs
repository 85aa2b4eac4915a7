// System status display: DB size, corpus counts and the last run.

use anyhow::Result;
use std::path::Path;

use crate::db::{Corpus, SqliteStore};

/// Display system status to the terminal.
pub fn show(db_path: &str) -> Result<()> {
    if !Path::new(db_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `panelmatch init` to set up the database.");
        return Ok(());
    }

    let store = SqliteStore::open(db_path)?;

    // Database file size
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let baseline = store.count_documents(Corpus::Baseline)?;
    let comparison = store.count_documents(Corpus::Comparison)?;
    println!("Baseline documents: {baseline}");
    println!("Comparison documents: {comparison}");
    if baseline == 0 || comparison == 0 {
        println!("  Run `panelmatch import --corpus <baseline|comparison> <file>` to add documents");
    }

    match store.latest_run()? {
        Some(run) => {
            println!(
                "Last run: #{} at {} (top {}, {} × {} documents, vocabulary {})",
                run.id,
                run.created_at,
                run.options.top_n,
                run.baseline_count,
                run.comparison_count,
                run.vocabulary_size,
            );
            println!("Stored runs: {}", store.count_runs()?);
        }
        None => {
            println!("Last run: never");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
