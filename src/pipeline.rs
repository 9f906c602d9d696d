//! Batch scoring of extracted articles.
//!
//! The pipeline mirrors what a scraping run does once article text is in
//! hand:
//!
//! 1. **Loading**: Read article JSON files (concurrently, file order kept)
//! 2. **Grouping**: Resolve each article's configured source
//! 3. **Scoring**: Per source, cap the article count, skip URLs already
//!    seen in this run, resolve the language, score and classify
//! 4. **Keeping**: Only articles scoring above zero are kept
//!
//! Per-article problems (unknown source, bad language tag) are logged,
//! recorded in the run's error log and never abort the batch.

use chrono::{Local, Utc};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{AppConfig, SourceConfig};
use crate::error::RelevanceError;
use crate::models::{Article, BatchRun, ErrorRecord, Language, ScoredArticle, SessionStats};
use crate::scoring::RelevanceScorer;
use crate::utils::truncate_for_log;

const INPUT_READ_CONCURRENCY: usize = 4;

/// Read every input file as a JSON array of [`Article`]s.
///
/// # Errors
///
/// Fails on the first file that cannot be read or parsed.
#[instrument(level = "info", skip_all, fields(files = paths.len()))]
pub async fn load_articles(paths: &[PathBuf]) -> Result<Vec<Article>, RelevanceError> {
    let loaded: Vec<Result<Vec<Article>, RelevanceError>> = stream::iter(paths.iter().cloned())
        .map(|path| async move {
            let raw = fs::read_to_string(&path)
                .await
                .map_err(|e| RelevanceError::io(&path, e))?;
            let articles: Vec<Article> = serde_json::from_str(&raw)?;
            info!(path = %path.display(), count = articles.len(), "Loaded articles");
            Ok::<_, RelevanceError>(articles)
        })
        .buffered(INPUT_READ_CONCURRENCY)
        .collect()
        .await;

    let mut articles = Vec::new();
    for batch in loaded {
        articles.extend(batch?);
    }
    info!(count = articles.len(), "Total articles to score");
    Ok(articles)
}

/// Articles of one source, in input order.
struct SourceGroup<'a> {
    name: String,
    config: Option<&'a SourceConfig>,
    articles: Vec<Article>,
}

/// Group articles by resolved source, in order of first appearance.
fn group_by_source(articles: Vec<Article>, config: &AppConfig) -> Vec<SourceGroup<'_>> {
    let mut groups: Vec<SourceGroup<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let source = config.find_source(&article);
        let name = match source {
            Some(s) => s.name.clone(),
            None => unresolved_source_name(&article),
        };
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            groups.push(SourceGroup {
                name,
                config: source,
                articles: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].articles.push(article);
    }
    groups
}

fn unresolved_source_name(article: &Article) -> String {
    if let Some(name) = article.source.as_deref() {
        return name.trim().to_string();
    }
    Url::parse(&article.url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// The article's own language tag if it has one, else its source's language.
fn resolve_language(
    article: &Article,
    source: Option<&SourceConfig>,
    source_name: &str,
) -> Result<Language, RelevanceError> {
    match (article.language.as_deref(), source) {
        (Some(tag), _) => tag.parse(),
        (None, Some(source)) => Ok(source.language),
        (None, None) => Err(RelevanceError::UnknownSource(source_name.to_string())),
    }
}

/// Score every article and collect kept results, per-source stats and errors.
///
/// Articles are processed per source in order of first appearance. Each
/// source is capped at `max_per_source` articles before duplicates are
/// skipped. A URL counts as seen only once its article was scored, so a copy
/// that failed (e.g. a bad language tag) does not block a later good one.
///
/// # Arguments
///
/// * `articles` - Loaded articles, in input order
/// * `config` - Sources used to resolve each article's source and language
/// * `scorer` - Compiled rule book
/// * `max_per_source` - Maximum articles scored per source
///
/// # Returns
///
/// A [`BatchRun`] holding the articles with a score above zero, one
/// [`SessionStats`] per source and an [`ErrorRecord`] per failed article.
/// Per-article failures never abort the run.
#[instrument(level = "info", skip(articles, config, scorer))]
pub fn run_batch(
    articles: Vec<Article>,
    config: &AppConfig,
    scorer: &RelevanceScorer,
    max_per_source: usize,
) -> BatchRun {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();
    let mut errors = Vec::new();
    let mut sessions = Vec::new();

    for group in group_by_source(articles, config) {
        let mut stats = SessionStats::start(&group.name);
        let total = group.articles.len();
        let capped: Vec<Article> = group.articles.into_iter().take(max_per_source).collect();
        stats.articles_found = capped.len();
        info!(
            source = %group.name,
            found = stats.articles_found,
            skipped_over_cap = total - stats.articles_found,
            "Scoring source"
        );

        for (i, article) in capped.into_iter().enumerate() {
            debug!(index = i + 1, of = stats.articles_found, url = %article.url, "Processing");
            if seen_urls.contains(&article.url) {
                info!(url = %article.url, "Already seen in this run, skipping");
                continue;
            }
            stats.articles_new += 1;

            let language = match resolve_language(&article, group.config, &group.name) {
                Ok(language) => language,
                Err(e) => {
                    warn!(source = %group.name, url = %article.url, error = %e, "Cannot score article");
                    errors.push(ErrorRecord::new(&group.name, &article.url, &e));
                    stats.errors += 1;
                    continue;
                }
            };
            seen_urls.insert(article.url.clone());

            let result = scorer.score(&article.scoring_text(), language);
            let relevance = result.relevance();
            info!(
                title = %truncate_for_log(&article.title, 60),
                score = result.score,
                %relevance,
                "Scored article"
            );

            if result.score > 0.0 {
                kept.push(ScoredArticle {
                    source: group.name.clone(),
                    source_bias: group.config.and_then(|s| s.bias.clone()),
                    language,
                    url: article.url,
                    title: article.title,
                    authors: article.authors,
                    published_date: article.published_date,
                    scored_at: Utc::now(),
                    text: article.text,
                    score: result.score,
                    relevance,
                    matches: result.matches,
                    categories: result.categories,
                });
                stats.articles_kept += 1;
            } else {
                debug!(url = %article.url, "Score 0, not keeping");
            }
        }

        stats.finish();
        info!(
            source = %stats.source,
            new = stats.articles_new,
            kept = stats.articles_kept,
            errors = stats.errors,
            status = ?stats.status,
            "Finished source"
        );
        sessions.push(stats);
    }

    BatchRun {
        run_date: Local::now().date_naive(),
        generated_at: Utc::now(),
        sessions,
        articles: kept,
        errors,
    }
}
