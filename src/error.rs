//! Error types for rule compilation, language parsing and batch I/O.
//!
//! Scoring itself cannot fail: empty text, texts without matches and texts
//! hit by an exclusion pattern all produce a zero score. Errors only arise
//! at the edges, when a language tag is parsed, when a rule book is
//! compiled, or when files are read and written.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::Language;

/// Everything that can go wrong in this crate.
#[derive(Debug, Error)]
pub enum RelevanceError {
    /// The language tag is not one of the supported rule-set languages.
    #[error("unsupported language tag: {0:?} (expected \"en\" or \"es\")")]
    InvalidLanguage(String),

    /// A keyword pattern in a rule book failed to compile.
    #[error("invalid pattern {pattern:?} in category {category} ({language}): {source}")]
    InvalidPattern {
        language: Language,
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A scoring category carries a weight that is not strictly positive.
    /// Only the exclusion category may be negative.
    #[error("category {category} ({language}) has non-positive weight {weight}")]
    InvalidWeight {
        language: Language,
        category: String,
        weight: i32,
    },

    /// An article names no configured source and carries no language tag.
    #[error("no configured source matches {0:?}")]
    UnknownSource(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RelevanceError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly tag used in the batch error log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidLanguage(_) => "INVALID_LANGUAGE",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::InvalidWeight { .. } => "INVALID_WEIGHT",
            Self::UnknownSource(_) => "UNKNOWN_SOURCE",
            Self::Io { .. } => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
        }
    }
}
