//! Command-line interface definitions.
//!
//! Options can be provided via command-line flags; the config path can also
//! come from the `RELEVANCE_CONFIG` environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Score a single text
/// heat_news_relevance score --language en --text "Farm worker heat death"
///
/// # Score extracted articles and write results plus a report
/// heat_news_relevance batch -i articles.json -o ./out
///
/// # Dump the effective rule tables as YAML
/// heat_news_relevance --config config.yaml rules
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "RELEVANCE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one text and print the result as JSON
    Score {
        /// Language tag of the text ("en" or "es")
        #[arg(short, long)]
        language: String,

        /// Text to score (reads --file or stdin when omitted)
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// File containing the text to score
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Headline, scored together with the body
        #[arg(long)]
        title: Option<String>,
    },

    /// Score article JSON files and write results and a summary report
    Batch {
        /// JSON file holding an array of articles (repeatable)
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for results.json and report.txt
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Maximum articles scored per source [default: from config, else 50]
        #[arg(long)]
        max_per_source: Option<usize>,
    },

    /// Print the effective keyword rule tables as YAML
    Rules,
}

impl Command {
    /// Per-source cap for a batch: the flag wins over the config value.
    pub fn max_per_source(flag: Option<usize>, configured: usize) -> usize {
        flag.unwrap_or(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_ARTICLES_PER_SOURCE;

    #[test]
    fn test_cli_score() {
        let cli = Cli::parse_from([
            "heat_news_relevance",
            "score",
            "--language",
            "en",
            "--text",
            "heat death",
        ]);
        match cli.command {
            Command::Score {
                language, text, file, title,
            } => {
                assert_eq!(language, "en");
                assert_eq!(text.as_deref(), Some("heat death"));
                assert!(file.is_none());
                assert!(title.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_batch_short_flags() {
        let cli = Cli::parse_from([
            "heat_news_relevance",
            "-c",
            "/etc/relevance.yaml",
            "batch",
            "-i",
            "a.json",
            "-i",
            "b.json",
            "-o",
            "/tmp/out",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/relevance.yaml")));
        match cli.command {
            Command::Batch {
                inputs,
                output_dir,
                max_per_source,
            } => {
                assert_eq!(inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(output_dir, PathBuf::from("/tmp/out"));
                assert_eq!(max_per_source, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_batch_requires_input() {
        let result = Cli::try_parse_from(["heat_news_relevance", "batch", "-o", "/tmp/out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_text_and_file_conflict() {
        let result = Cli::try_parse_from([
            "heat_news_relevance",
            "score",
            "-l",
            "es",
            "-t",
            "calor",
            "-f",
            "story.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_max_per_source_precedence() {
        assert_eq!(Command::max_per_source(Some(5), 50), 5);
        assert_eq!(Command::max_per_source(None, DEFAULT_MAX_ARTICLES_PER_SOURCE), 50);
    }
}
