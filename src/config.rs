use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::pipeline::MatchOptions;
use crate::text::{Language, TextOptions};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; CLI flags override these
/// values for a single run.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database used by `import`, `run --db`, `show` and `status`
    pub db_path: String,
    /// Where CSV exports land unless a path is given explicitly
    pub output_dir: PathBuf,
    /// Default matching options
    pub options: MatchOptions,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Unset keys fall
    /// back to defaults; set-but-unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MatchOptions::default();

        let language = match lookup("PANELMATCH_LANGUAGE") {
            Some(code) => Language::from_str(&code)
                .with_context(|| format!("PANELMATCH_LANGUAGE has an unsupported value '{code}'"))?,
            None => defaults.text.language,
        };

        let options = MatchOptions {
            text: TextOptions {
                use_stopwords: parse_var(&lookup, "PANELMATCH_USE_STOPWORDS", parse_bool)?
                    .unwrap_or(defaults.text.use_stopwords),
                use_ngrams: parse_var(&lookup, "PANELMATCH_USE_NGRAMS", parse_bool)?
                    .unwrap_or(defaults.text.use_ngrams),
                n_grams: parse_var(&lookup, "PANELMATCH_NGRAMS", parse_usize)?
                    .unwrap_or(defaults.text.n_grams),
                language,
            },
            top_n: parse_var(&lookup, "PANELMATCH_TOP_N", parse_usize)?.unwrap_or(defaults.top_n),
        };

        Ok(Self {
            db_path: lookup("PANELMATCH_DB_PATH").unwrap_or_else(|| "./panelmatch.db".to_string()),
            output_dir: lookup("PANELMATCH_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./output")),
            options,
        })
    }

    /// The configured options, checked for range errors.
    pub fn match_options(&self) -> Result<MatchOptions> {
        self.options
            .validate()
            .context("Invalid matching options. Check PANELMATCH_* variables and CLI flags.")?;
        Ok(self.options)
    }
}

fn parse_var<F, T, P>(lookup: &F, key: &str, parse: P) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match lookup(key) {
        Some(raw) => match parse(raw.trim()) {
            Some(value) => Ok(Some(value)),
            None => anyhow::bail!("{key} has an invalid value '{raw}'"),
        },
        None => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_usize(raw: &str) -> Option<usize> {
    raw.parse().ok()
}
