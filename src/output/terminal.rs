// Colored terminal output for ranked matches and run summaries.
//
// All terminal-specific formatting lives here; main.rs delegates.

use colored::Colorize;

use super::MatchSink;
use crate::pipeline::MatchStats;
use crate::similarity::RankedMatches;

/// Display the ranked matches as a table, best match first per row.
pub fn display_matches(matches: &RankedMatches, top_n: usize, limit: Option<usize>) {
    if matches.is_empty() {
        println!("No comparison documents were ranked.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Ranked Matches ({} comparison documents, top {}) ===",
            matches.len(),
            top_n
        )
        .bold()
    );
    println!();

    println!(
        "  {:<24} {:>4}  {:<24} {:>7}",
        "Comparison".dimmed(),
        "Rank".dimmed(),
        "Baseline".dimmed(),
        "Score".dimmed(),
    );
    println!("  {}", "-".repeat(64).dimmed());

    let shown = limit.unwrap_or(matches.len());
    for entry in matches.iter().take(shown) {
        let comparison = super::truncate_chars(&entry.comparison_id, 24);

        if entry.matches.is_empty() {
            println!("  {:<24} {:>4}  {}", comparison, "-", "no baseline documents".dimmed());
            continue;
        }

        for (i, m) in entry.matches.iter().enumerate() {
            let label = if i == 0 { comparison.as_str() } else { "" };
            println!(
                "  {:<24} {:>4}  {:<24} {}",
                label,
                i + 1,
                super::truncate_chars(&m.baseline_id, 24),
                colorize_score(m.score),
            );
        }
    }

    if shown < matches.len() {
        println!(
            "\n  {}",
            format!("... {} more comparison documents not shown", matches.len() - shown).dimmed()
        );
    }
    println!();
}

/// Display the counts and timing of a run.
pub fn display_stats(stats: &MatchStats) {
    println!("\n{}", "Run complete.".bold());
    println!(
        "  Baseline documents:   {} ({} without tokens)",
        stats.baseline_docs, stats.empty_baseline
    );
    println!(
        "  Comparison documents: {} ({} without tokens)",
        stats.comparison_docs, stats.empty_comparison
    );
    println!("  Vocabulary size:      {}", stats.vocabulary_size);
    println!("  Elapsed:              {} ms", stats.elapsed_ms);
}

/// Color a similarity score by strength.
fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:>7.4}");
    if score >= 0.5 {
        text.bright_green()
    } else if score >= 0.2 {
        text.yellow()
    } else if score > 0.0 {
        text.normal()
    } else {
        text.dimmed()
    }
}

/// A sink that prints to the terminal instead of persisting.
pub struct TerminalSink {
    pub limit: Option<usize>,
}

impl MatchSink for TerminalSink {
    fn write(&mut self, matches: &RankedMatches, top_n: usize) -> anyhow::Result<()> {
        display_matches(matches, top_n, self.limit);
        Ok(())
    }
}
