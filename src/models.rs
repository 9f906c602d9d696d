//! Data models for articles, scoring results and batch runs.
//!
//! This module defines the structures shared by the scorer, the batch
//! pipeline and the output writers:
//! - [`Language`]: The closed set of rule-set languages
//! - [`Article`]: An already-extracted article as supplied by the caller
//! - [`ScoreResult`], [`Match`], [`CategoryBreakdown`]: Scorer output
//! - [`ScoredArticle`], [`SessionStats`], [`ErrorRecord`], [`BatchRun`]:
//!   What a batch run produces and writes to disk

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RelevanceError;
use crate::scoring::{Relevance, classify};

/// Language of an article, selecting which keyword rule set applies.
///
/// Parsing is strict: only `"en"` and `"es"` (any case, surrounding
/// whitespace ignored) are accepted. Anything else is an
/// [`RelevanceError::InvalidLanguage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    En,
    Es,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Human-readable name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = RelevanceError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            _ => Err(RelevanceError::InvalidLanguage(tag.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = RelevanceError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

/// A single keyword occurrence found in the text.
///
/// One record is produced per occurrence, so a pattern matching three
/// times yields three records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// The literal (lowercased) text that matched.
    pub keyword: String,
    /// Name of the category whose pattern matched.
    pub category: String,
    /// Weight the occurrence contributed to the score.
    pub weight: i32,
}

/// Per-category aggregation of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Total occurrences in this category.
    pub matches: usize,
    /// Number of distinct matched strings.
    pub unique_matches: usize,
    /// Sum of weights contributed by this category.
    pub score: i64,
}

/// The output of a single scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreResult {
    pub score: f64,
    pub matches: Vec<Match>,
    pub categories: BTreeMap<String, CategoryBreakdown>,
}

impl ScoreResult {
    /// The result returned for empty, unmatched or excluded text.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn relevance(&self) -> Relevance {
        classify(self.score)
    }
}

/// An article as handed to the batch pipeline.
///
/// Extraction (download, HTML parsing) happens upstream; this is the plain
/// text record the extractor produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Name of a configured news source. When missing the source is
    /// looked up by the URL host.
    #[serde(default)]
    pub source: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    /// Language tag overriding the source's configured language.
    #[serde(default)]
    pub language: Option<String>,
}

impl Article {
    /// Title and body joined the way they are scored.
    pub fn scoring_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.text)
    }
}

/// An article that scored above zero, kept in the batch results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub source: String,
    pub source_bias: Option<String>,
    pub language: Language,
    pub url: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: Option<NaiveDate>,
    pub scored_at: DateTime<Utc>,
    pub text: String,
    pub score: f64,
    pub relevance: Relevance,
    pub matches: Vec<Match>,
    pub categories: BTreeMap<String, CategoryBreakdown>,
}

/// Outcome of processing one source's articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Completed,
    Failed,
}

/// Per-source counters for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub source: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Articles supplied for this source (after the per-source cap).
    pub articles_found: usize,
    /// Articles whose URL had not been seen earlier in the run.
    pub articles_new: usize,
    /// Articles that scored above zero and were kept.
    pub articles_kept: usize,
    pub errors: usize,
    pub status: SessionStatus,
}

impl SessionStats {
    pub fn start(source: &str) -> Self {
        Self {
            source: source.to_string(),
            start_time: Utc::now(),
            end_time: None,
            articles_found: 0,
            articles_new: 0,
            articles_kept: 0,
            errors: 0,
            status: SessionStatus::Completed,
        }
    }

    /// Close the session. A source whose every article failed is marked failed.
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
        self.status = if self.articles_found > 0 && self.errors == self.articles_found {
            SessionStatus::Failed
        } else {
            SessionStatus::Completed
        };
    }
}

/// One entry of the batch error log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub url: String,
    pub error_type: String,
    pub error_message: String,
}

impl ErrorRecord {
    /// Record a per-article failure; `error_type` is [`RelevanceError::kind`].
    pub fn new(source: &str, url: &str, err: &RelevanceError) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.to_string(),
            url: url.to_string(),
            error_type: err.kind().to_string(),
            error_message: err.to_string(),
        }
    }
}

/// Everything a batch run produced, serialized as `results.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    pub run_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub sessions: Vec<SessionStats>,
    pub articles: Vec<ScoredArticle>,
    pub errors: Vec<ErrorRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Es);
        assert_eq!(" en ".parse::<Language>().unwrap(), Language::En);
    }

    #[test]
    fn test_language_rejects_unknown_tags() {
        for tag in ["fr", "", "english", "en-US", "spanish"] {
            match tag.parse::<Language>() {
                Err(RelevanceError::InvalidLanguage(t)) => assert_eq!(t, tag),
                other => panic!("expected InvalidLanguage for {tag:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_language_serde() {
        let json = serde_json::to_string(&Language::Es).unwrap();
        assert_eq!(json, "\"es\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::En);
        assert!(serde_json::from_str::<Language>("\"de\"").is_err());
    }

    #[test]
    fn test_article_deserialization_defaults() {
        let json = r#"{
            "url": "https://www.ivpressonline.com/news/local/story",
            "text": "Body text"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.source, None);
        assert_eq!(article.title, "");
        assert!(article.authors.is_empty());
        assert_eq!(article.language, None);
    }

    #[test]
    fn test_scoring_text_joins_title_and_body() {
        let article = Article {
            source: None,
            url: "https://example.com/a".to_string(),
            title: "Heat wave".to_string(),
            text: "Temperatures soared.".to_string(),
            authors: vec![],
            published_date: None,
            language: None,
        };
        assert_eq!(article.scoring_text(), "Heat wave\n\nTemperatures soared.");
    }

    #[test]
    fn test_session_marked_failed_when_every_article_errors() {
        let mut stats = SessionStats::start("Calexico Chronicle");
        stats.articles_found = 2;
        stats.errors = 2;
        stats.finish();
        assert_eq!(stats.status, SessionStatus::Failed);
        assert!(stats.end_time.is_some());

        let mut stats = SessionStats::start("Calexico Chronicle");
        stats.finish();
        assert_eq!(stats.status, SessionStatus::Completed);
    }

    #[test]
    fn test_error_record_uses_error_kind() {
        let record = ErrorRecord::new(
            "Adelante Valle",
            "https://www.ivpressonline.com/adelante-valle/1",
            &RelevanceError::InvalidLanguage("pt".to_string()),
        );
        assert_eq!(record.error_type, "INVALID_LANGUAGE");
        assert!(record.error_message.contains("\"pt\""));

        let record = ErrorRecord::new(
            "example.com",
            "https://example.com/a",
            &RelevanceError::UnknownSource("example.com".to_string()),
        );
        assert_eq!(record.error_type, "UNKNOWN_SOURCE");
    }
}
