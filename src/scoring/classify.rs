//! Score-to-label classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete relevance bands, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relevance {
    ExtremelyRelevant,
    HighlyRelevant,
    ModeratelyRelevant,
    MinimallyRelevant,
    NotRelevant,
}

impl Relevance {
    /// Map a score to its band. Lower bounds are inclusive; anything that
    /// is not strictly positive (including NaN) is [`Relevance::NotRelevant`].
    pub fn from_score(score: f64) -> Self {
        if score >= 50.0 {
            Relevance::ExtremelyRelevant
        } else if score >= 20.0 {
            Relevance::HighlyRelevant
        } else if score >= 10.0 {
            Relevance::ModeratelyRelevant
        } else if score > 0.0 {
            Relevance::MinimallyRelevant
        } else {
            Relevance::NotRelevant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relevance::ExtremelyRelevant => "EXTREMELY_RELEVANT",
            Relevance::HighlyRelevant => "HIGHLY_RELEVANT",
            Relevance::ModeratelyRelevant => "MODERATELY_RELEVANT",
            Relevance::MinimallyRelevant => "MINIMALLY_RELEVANT",
            Relevance::NotRelevant => "NOT_RELEVANT",
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-function form of [`Relevance::from_score`].
pub fn classify(score: f64) -> Relevance {
    Relevance::from_score(score)
}
