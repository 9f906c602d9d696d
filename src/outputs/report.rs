//! Plain-text summary report of a batch run.
//!
//! The report aggregates the kept articles by relevance label, by source
//! and by language, lists the ten highest-scoring articles, and closes with
//! the per-source session counters.

use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use super::run_dir;
use crate::error::RelevanceError;
use crate::models::{BatchRun, ScoredArticle};

const RULE_WIDTH: usize = 80;
const TOP_ARTICLES: usize = 10;
const TITLE_WIDTH: usize = 70;

fn average_score(articles: &[&ScoredArticle]) -> f64 {
    if articles.is_empty() {
        return 0.0;
    }
    articles.iter().map(|a| a.score).sum::<f64>() / articles.len() as f64
}

fn by_score_desc(a: &ScoredArticle, b: &ScoredArticle) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Build the summary report text.
pub fn generate_summary_report(run: &BatchRun) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "RELEVANCE SUMMARY REPORT ({})", run.run_date);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "\nTotal Articles Kept: {}", run.articles.len());

    let _ = writeln!(out, "\nBy Relevance Category:");
    let by_relevance = run
        .articles
        .iter()
        .into_group_map_by(|a| a.relevance)
        .into_iter()
        .map(|(label, group)| (label, group.len(), average_score(&group)))
        .sorted_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));
    for (label, count, avg) in by_relevance {
        let _ = writeln!(
            out,
            "  {:<25} {:>4} articles (avg score: {:.1})",
            label.as_str(),
            count,
            avg
        );
    }

    let _ = writeln!(out, "\nBy Source:");
    let by_source = run
        .articles
        .iter()
        .into_group_map_by(|a| a.source.clone())
        .into_iter()
        .map(|(source, group)| (source, group.len(), average_score(&group)))
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (source, count, avg) in by_source {
        let _ = writeln!(
            out,
            "  {:<30} {:>4} articles (avg score: {:.1})",
            source, count, avg
        );
    }

    let _ = writeln!(out, "\nBy Language:");
    let by_language = run.articles.iter().counts_by(|a| a.language);
    for (language, count) in by_language.into_iter().sorted() {
        let _ = writeln!(out, "  {:<30} {:>4} articles", language.display_name(), count);
    }

    let _ = writeln!(out, "\nTop {TOP_ARTICLES} Most Relevant Articles:");
    let top = run
        .articles
        .iter()
        .sorted_by(|a, b| by_score_desc(a, b))
        .take(TOP_ARTICLES);
    for (i, article) in top.enumerate() {
        let title: String = article.title.chars().take(TITLE_WIDTH).collect();
        let _ = writeln!(out, "\n  {}. [{:.1}] {}", i + 1, article.score, title);
        let _ = writeln!(
            out,
            "     Source: {} | Category: {}",
            article.source, article.relevance
        );
    }

    let _ = writeln!(out, "\nSources Processed:");
    for session in &run.sessions {
        let _ = writeln!(
            out,
            "  {:<30} found {:>3}, new {:>3}, kept {:>3}, errors {:>3} ({:?})",
            session.source,
            session.articles_found,
            session.articles_new,
            session.articles_kept,
            session.errors,
            session.status
        );
    }
    if !run.errors.is_empty() {
        let _ = writeln!(out, "\nErrors Logged: {}", run.errors.len());
    }

    let _ = writeln!(out, "\n{rule}");
    out
}

/// Write the report to `{output_dir}/{run_date}/report.txt`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    report: &str,
    run: &BatchRun,
    output_dir: &Path,
) -> Result<PathBuf, RelevanceError> {
    let dir = run_dir(output_dir, run);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| RelevanceError::io(&dir, e))?;
    let path = dir.join("report.txt");
    fs::write(&path, report)
        .await
        .map_err(|e| RelevanceError::io(&path, e))?;
    info!(path = %path.display(), "Wrote summary report");
    Ok(path)
}
