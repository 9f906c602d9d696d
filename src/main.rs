//! # Heat News Relevance
//!
//! Scores already-extracted news articles for relevance to heat-related
//! deaths, in English and Spanish, and classifies them into relevance bands.
//!
//! ## Features
//!
//! - Weighted multi-category keyword scoring with exclusion short-circuiting
//! - Strict language handling (`en`/`es`), never a silent default
//! - Declarative rule tables, overridable per language from a YAML config
//! - Batch mode with per-source stats, an error log, JSON results and a
//!   plain-text summary report
//!
//! ## Usage
//!
//! ```sh
//! heat_news_relevance score -l en -t "Farm worker heat death"
//! heat_news_relevance batch -i articles.json -o ./out
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: Load sources and rule overrides, compile the scorer
//! 2. **Loading**: Read article JSON files
//! 3. **Scoring**: Score, classify and keep articles above zero
//! 4. **Output**: Write `results.json` and `report.txt`

use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scoring;
mod utils;

use cli::{Cli, Command};
use config::AppConfig;
use error::RelevanceError;
use models::ScoreResult;
use outputs::{json, report};
use scoring::{Relevance, RelevanceScorer};
use utils::ensure_writable_dir;

/// What `score` prints.
#[derive(Debug, Serialize)]
struct ScoreOutput {
    relevance: Relevance,
    #[serde(flatten)]
    result: ScoreResult,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = AppConfig::load_or_default(args.config.as_deref()).await?;
    let rule_book = config.rule_book();
    let scorer = RelevanceScorer::new(&rule_book)?;

    match args.command {
        Command::Score {
            language,
            text,
            file,
            title,
        } => {
            let body = read_text(text, file.as_deref()).await?;
            let full_text = match title {
                Some(title) => format!("{title}\n\n{body}"),
                None => body,
            };
            let result = scorer.score_tagged(&full_text, &language)?;
            let output = ScoreOutput {
                relevance: result.relevance(),
                result,
            };
            info!(score = output.result.score, relevance = %output.relevance, "Scored text");
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Batch {
            inputs,
            output_dir,
            max_per_source,
        } => {
            let max_per_source =
                Command::max_per_source(max_per_source, config.max_articles_per_source);
            run_batch_command(&config, &scorer, &inputs, &output_dir, max_per_source).await?;
        }
        Command::Rules => {
            print!("{}", serde_yaml::to_string(&rule_book)?);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Text from the flag, else from the file, else from stdin.
async fn read_text(text: Option<String>, file: Option<&Path>) -> Result<String, RelevanceError> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RelevanceError::io(path, e));
    }
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .map_err(|e| RelevanceError::io("<stdin>", e))?;
    Ok(buf)
}

#[instrument(level = "info", skip(config, scorer, inputs, output_dir), fields(output_dir = %output_dir.display()))]
async fn run_batch_command(
    config: &AppConfig,
    scorer: &RelevanceScorer,
    inputs: &[PathBuf],
    output_dir: &Path,
    max_per_source: usize,
) -> Result<(), RelevanceError> {
    // Early check: fail before scoring if results cannot be written
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let articles = pipeline::load_articles(inputs).await?;
    let run = pipeline::run_batch(articles, config, scorer, max_per_source);

    json::write_batch_run(&run, output_dir).await?;

    let summary = report::generate_summary_report(&run);
    info!("\n{summary}");
    if let Err(e) = report::write_report(&summary, &run, output_dir).await {
        error!(error = %e, "Failed to write summary report");
    }

    info!(
        kept = run.articles.len(),
        sources = run.sessions.len(),
        errors = run.errors.len(),
        "Batch complete"
    );
    Ok(())
}
