// Output: result sinks, tabular export, and terminal display.

pub mod export;
pub mod terminal;

use anyhow::Result;

use crate::similarity::RankedMatches;

pub use export::CsvExport;

/// Anything that accepts the final ranking for persistence or display.
///
/// Implementations: `CsvExport`, and (with the `sqlite` feature)
/// `db::SqliteSink`.
pub trait MatchSink {
    /// Write one row per comparison id with up to `top_n` ranked baseline ids.
    fn write(&mut self, matches: &RankedMatches, top_n: usize) -> Result<()>;
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
