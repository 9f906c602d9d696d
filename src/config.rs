//! YAML configuration: news sources and rule-set overrides.
//!
//! ```yaml
//! max_articles_per_source: 50
//! sources:
//!   - name: Imperial Valley Press
//!     url: https://www.ivpressonline.com
//!     language: en
//!     bias: LOCAL-UNRATED
//! rules:
//!   es:
//!     categories:
//!       - name: environmental
//!         weight: 2
//!         patterns: ['ola\s+de\s+calor']
//! ```
//!
//! Every key is optional. Without a config file the built-in sources and
//! rule tables are used.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::RelevanceError;
use crate::models::{Article, Language};
use crate::scoring::{RuleBook, RuleOverrides};

pub const DEFAULT_MAX_ARTICLES_PER_SOURCE: usize = 50;

/// A configured news outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Base URL. A path component scopes the source to a section of a
    /// shared host (e.g. a Spanish-language section of an English paper).
    pub url: String,
    pub language: Language,
    #[serde(default)]
    pub bias: Option<String>,
}

impl SourceConfig {
    fn new(name: &str, url: &str, language: Language, bias: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            language,
            bias: Some(bias.to_string()),
        }
    }

    /// Length of the path prefix this source shares with `article_url`, or
    /// `None` when the host differs or the path is outside the source.
    fn url_affinity(&self, article_url: &Url) -> Option<usize> {
        let base = Url::parse(&self.url).ok()?;
        if base.host_str()? != article_url.host_str()? {
            return None;
        }
        let prefix = base.path().trim_end_matches('/');
        let path = article_url.path();
        let inside = prefix.is_empty()
            || path == prefix
            || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'));
        inside.then_some(prefix.len())
    }
}

/// Imperial Valley outlets scored by default.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new(
            "Imperial Valley Press",
            "https://www.ivpressonline.com",
            Language::En,
            "LOCAL-UNRATED",
        ),
        SourceConfig::new(
            "Calexico Chronicle",
            "https://calexicochronicle.com",
            Language::En,
            "LOCAL-UNRATED",
        ),
        SourceConfig::new(
            "Holtville Tribune",
            "https://holtvilletribune.com",
            Language::En,
            "LOCAL-UNRATED",
        ),
        SourceConfig::new(
            "The Desert Review",
            "https://www.thedesertreview.com",
            Language::En,
            "LOCAL-UNRATED",
        ),
        SourceConfig::new(
            "Adelante Valle",
            "https://www.ivpressonline.com/adelante-valle",
            Language::Es,
            "LOCAL-UNRATED",
        ),
    ]
}

fn default_max_articles_per_source() -> usize {
    DEFAULT_MAX_ARTICLES_PER_SOURCE
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub rules: RuleOverrides,
    #[serde(default = "default_max_articles_per_source")]
    pub max_articles_per_source: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            rules: RuleOverrides::default(),
            max_articles_per_source: DEFAULT_MAX_ARTICLES_PER_SOURCE,
        }
    }
}

impl AppConfig {
    /// Read a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, RelevanceError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| RelevanceError::io(path, e))?;
        let config: AppConfig = serde_yaml::from_str(&raw)?;
        info!(
            sources = config.sources.len(),
            en_override = config.rules.en.is_some(),
            es_override = config.rules.es.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, RelevanceError> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                debug!("No config file given; using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Built-in rule book with this config's overrides applied.
    pub fn rule_book(&self) -> RuleBook {
        RuleBook::builtin().with_overrides(&self.rules)
    }

    /// Find the configured source of an article.
    ///
    /// An explicit source name wins (case-insensitive). Otherwise the
    /// article URL is matched against source URLs, preferring the longest
    /// matching path prefix, so a section such as `/adelante-valle` wins
    /// over the bare host of the same paper.
    ///
    /// # Arguments
    ///
    /// * `article` - The article whose `source` name or `url` is looked up
    ///
    /// # Returns
    ///
    /// The matching source, or `None` when the name is not configured or the
    /// URL does not parse or belongs to no configured host.
    pub fn find_source(&self, article: &Article) -> Option<&SourceConfig> {
        if let Some(name) = article.source.as_deref() {
            return self
                .sources
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name.trim()));
        }
        let article_url = Url::parse(&article.url).ok()?;
        self.sources
            .iter()
            .filter_map(|s| s.url_affinity(&article_url).map(|len| (len, s)))
            .max_by_key(|(len, _)| *len)
            .map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(source: Option<&str>, url: &str) -> Article {
        Article {
            source: source.map(str::to_string),
            url: url.to_string(),
            title: String::new(),
            text: String::new(),
            authors: vec![],
            published_date: None,
            language: None,
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.sources.len(), 5);
        assert_eq!(config.max_articles_per_source, 50);
        assert_eq!(config.rule_book(), RuleBook::builtin());
    }

    #[test]
    fn test_find_source_by_name() {
        let config = AppConfig::default();
        let found = config
            .find_source(&article(Some("calexico chronicle"), "https://elsewhere.org/x"))
            .unwrap();
        assert_eq!(found.name, "Calexico Chronicle");
        assert!(config.find_source(&article(Some("Nope"), "https://calexicochronicle.com/a")).is_none());
    }

    #[test]
    fn test_find_source_by_url_prefers_longest_path() {
        let config = AppConfig::default();
        let spanish = config
            .find_source(&article(None, "https://www.ivpressonline.com/adelante-valle/noticias/calor"))
            .unwrap();
        assert_eq!(spanish.name, "Adelante Valle");
        assert_eq!(spanish.language, Language::Es);

        let english = config
            .find_source(&article(None, "https://www.ivpressonline.com/news/local/heat"))
            .unwrap();
        assert_eq!(english.name, "Imperial Valley Press");

        let sibling = config
            .find_source(&article(None, "https://www.ivpressonline.com/adelante-valleys"))
            .unwrap();
        assert_eq!(sibling.name, "Imperial Valley Press");
    }

    #[test]
    fn test_find_source_unknown_host() {
        let config = AppConfig::default();
        assert!(config.find_source(&article(None, "https://example.com/story")).is_none());
        assert!(config.find_source(&article(None, "not a url")).is_none());
    }

    #[test]
    fn test_yaml_partial_config() {
        let yaml = r#"
max_articles_per_source: 10
rules:
  es:
    categories:
      - name: environmental
        weight: 3
        patterns: ['ola\s+de\s+calor']
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_articles_per_source, 10);
        assert_eq!(config.sources, default_sources());
        let book = config.rule_book();
        assert_eq!(book.es.categories.len(), 1);
        assert_eq!(book.es.categories[0].weight, 3);
        assert_eq!(book.en, crate::scoring::rules::RuleSet::english());
    }

    #[test]
    fn test_yaml_rejects_unknown_language() {
        let yaml = r#"
sources:
  - name: Le Monde
    url: https://www.lemonde.fr
    language: fr
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "sources:\n  - name: Brawley News\n    url: https://brawley.example\n    language: en\n",
        )
        .unwrap();
        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].bias, None);

        let missing = AppConfig::load(&dir.path().join("missing.yaml")).await;
        assert!(matches!(missing, Err(RelevanceError::Io { .. })));
    }
}
