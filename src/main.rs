use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use panelmatch::config::Config;
use panelmatch::db::{Corpus, SqliteStore};
use panelmatch::documents::{CsvSource, DocumentSet, DocumentSource, JsonSource};
use panelmatch::output::terminal::{display_matches, display_stats, TerminalSink};
use panelmatch::output::{CsvExport, MatchSink};
use panelmatch::pipeline::MatchPipeline;
use panelmatch::text::{filter_by_language, Language, StopwordDetector};

/// Panelmatch: rank comparison documents against a baseline corpus.
///
/// For every comparison document (e.g. a grant application), finds the most
/// textually similar baseline documents (e.g. reviewer publications) using
/// TF-IDF over stemmed unigrams and n-grams with cosine similarity.
#[derive(Parser)]
#[command(name = "panelmatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How to read a document file.
#[derive(Args, Clone)]
struct InputArgs {
    /// Column holding the document id (CSV input)
    #[arg(long, default_value = "id")]
    id_column: String,

    /// Column(s) joined to form the document text (CSV input, repeatable)
    #[arg(long = "text-column", default_value = "text")]
    text_columns: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Import a CSV or JSON document file into the database
    Import {
        /// Which corpus the documents belong to
        #[arg(long)]
        corpus: Corpus,

        /// Path to a .csv or .json file
        file: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Add to the stored corpus instead of replacing it
        #[arg(long)]
        append: bool,
    },

    /// Rank comparison documents against baseline documents
    Run {
        /// Baseline file (.csv or .json); read from the database when omitted
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Comparison file (.csv or .json); read from the database when omitted
        #[arg(long)]
        comparison: Option<PathBuf>,

        #[command(flatten)]
        input: InputArgs,

        /// Number of baseline matches per comparison document
        #[arg(long)]
        top_n: Option<usize>,

        /// Keep stopwords in the unigram features
        #[arg(long)]
        no_stopwords: bool,

        /// Use unigram features only
        #[arg(long)]
        no_ngrams: bool,

        /// Longest n-gram to build (at least 2)
        #[arg(long)]
        ngrams: Option<usize>,

        /// Stopword and stemmer language (ISO code, e.g. en, de)
        #[arg(long)]
        language: Option<Language>,

        /// Drop documents not detected as the configured language
        #[arg(long)]
        language_filter: bool,

        /// Write the ranking to a CSV file (default: <output dir>/matches.csv)
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,

        /// Add similarity score columns to the CSV export
        #[arg(long)]
        scores: bool,

        /// Record the run in the database
        #[arg(long = "db")]
        save: bool,

        /// Max comparison documents to print (default: 20)
        #[arg(long, default_value = "20")]
        show: usize,
    },

    /// Show the most recent stored run
    Show {
        /// Max comparison documents to print
        #[arg(long)]
        limit: Option<usize>,

        /// Also export the run to a CSV file (default: <output dir>/run_<id>.csv)
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,
    },

    /// Show database status (document counts, last run)
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("panelmatch=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing panelmatch database...");
            let config = Config::load()?;
            let store = SqliteStore::initialize(&config.db_path)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {}", store.table_count()?);
            println!("\nNext step: import documents, e.g.");
            println!("  panelmatch import --corpus baseline publications.csv --text-column title --text-column abstract");
        }

        Commands::Import {
            corpus,
            file,
            input,
            append,
        } => {
            let config = Config::load()?;
            let store = SqliteStore::initialize(&config.db_path)?;

            let source = file_source(&file, &input);
            let docs = source.load()?;
            let stored = store.import(corpus, &docs, !append)?;

            println!(
                "{} {stored} {corpus} documents from {}",
                "Imported".bold(),
                file.display()
            );
            println!(
                "  {} now holds {} {corpus} documents",
                config.db_path,
                store.count_documents(corpus)?
            );
        }

        Commands::Run {
            baseline,
            comparison,
            input,
            top_n,
            no_stopwords,
            no_ngrams,
            ngrams,
            language,
            language_filter,
            csv,
            scores,
            save,
            show,
        } => {
            let mut config = Config::load()?;

            // CLI flags override the environment for this run
            if let Some(n) = top_n {
                config.options.top_n = n;
            }
            if no_stopwords {
                config.options.text.use_stopwords = false;
            }
            if no_ngrams {
                config.options.text.use_ngrams = false;
            }
            if let Some(n) = ngrams {
                config.options.text.n_grams = n;
            }
            if let Some(lang) = language {
                config.options.text.language = lang;
            }
            let options = config.match_options()?;

            let needs_db = baseline.is_none() || comparison.is_none() || save;
            let store = if needs_db {
                Some(SqliteStore::open(&config.db_path)?)
            } else {
                None
            };

            let mut baseline_docs =
                load_side(baseline.as_deref(), &input, store.as_ref(), Corpus::Baseline)?;
            let mut comparison_docs =
                load_side(comparison.as_deref(), &input, store.as_ref(), Corpus::Comparison)?;

            if language_filter {
                let detector = StopwordDetector::default();
                let target = options.text.language;
                let (kept, dropped) = filter_by_language(baseline_docs, &detector, target);
                println!("  Language filter ({target}): dropped {dropped} baseline documents");
                baseline_docs = kept;
                let (kept, dropped) = filter_by_language(comparison_docs, &detector, target);
                println!("  Language filter ({target}): dropped {dropped} comparison documents");
                comparison_docs = kept;
            }

            println!(
                "Ranking {} comparison documents against {} baseline documents...",
                comparison_docs.len(),
                baseline_docs.len()
            );

            let pipeline = MatchPipeline::new(options)?.with_progress(true);
            let report = pipeline.run(&baseline_docs, &comparison_docs)?;

            TerminalSink { limit: Some(show) }.write(&report.matches, options.top_n)?;
            display_stats(&report.stats);

            if let Some(path) = csv {
                let path = path.unwrap_or_else(|| config.output_dir.join("matches.csv"));
                write_csv(&path, &report.matches, options.top_n, scores)?;
            }

            if save {
                if let Some(store) = store.as_ref() {
                    let mut sink = store.sink(options, report.stats.clone());
                    sink.write(&report.matches, options.top_n)?;
                    if let Some(run_id) = sink.run_id() {
                        println!("  Saved as run #{run_id} in {}", config.db_path);
                    }
                }
            }
        }

        Commands::Show { limit, csv } => {
            let config = Config::load()?;
            let store = SqliteStore::open(&config.db_path)?;

            let Some((run, matches)) = store.latest_matches()? else {
                println!("No runs stored yet. Run `panelmatch run --db` first.");
                return Ok(());
            };

            println!(
                "Run #{} ({}): {} baseline × {} comparison documents",
                run.id, run.created_at, run.baseline_count, run.comparison_count
            );
            display_matches(&matches, run.options.top_n, limit);

            if let Some(path) = csv {
                let path = path.unwrap_or_else(|| config.output_dir.join(format!("run_{}.csv", run.id)));
                write_csv(&path, &matches, run.options.top_n, true)?;
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            panelmatch::status::show(&config.db_path)?;
        }
    }

    Ok(())
}

/// Pick a document source from the file extension: .json is read as a JSON
/// array, anything else as CSV.
fn file_source(path: &Path, input: &InputArgs) -> Box<dyn DocumentSource> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        Box::new(JsonSource::new(path))
    } else {
        Box::new(CsvSource::new(
            path,
            input.id_column.clone(),
            input.text_columns.clone(),
        ))
    }
}

/// Load one side of the comparison from a file, or from the database when
/// no file is given.
fn load_side(
    path: Option<&Path>,
    input: &InputArgs,
    store: Option<&SqliteStore>,
    corpus: Corpus,
) -> Result<DocumentSet> {
    let source: Box<dyn DocumentSource + '_> = match (path, store) {
        (Some(path), _) => file_source(path, input),
        (None, Some(store)) => Box::new(store.source(corpus)),
        (None, None) => anyhow::bail!(
            "No {corpus} documents: pass --{corpus} <file> or import them first."
        ),
    };

    info!(corpus = %corpus, source = %source.describe(), "Loading documents");
    let docs = source.load()?;
    if docs.is_empty() && corpus == Corpus::Comparison {
        anyhow::bail!("No comparison documents found in {}", source.describe());
    }
    Ok(docs)
}

fn write_csv(
    path: &Path,
    matches: &panelmatch::RankedMatches,
    top_n: usize,
    scores: bool,
) -> Result<()> {
    let mut export = CsvExport::create(path, scores)?;
    export.write(matches, top_n)?;
    println!(
        "\n{}",
        format!("CSV export saved to: {}", path.display()).bold()
    );
    Ok(())
}
