//! Relevance scoring and classification.
//!
//! # Submodules
//!
//! - [`rules`]: Declarative keyword tables ([`RuleBook`], [`RuleSet`])
//! - [`scorer`]: [`RelevanceScorer`], the weighted keyword matcher
//! - [`classify`]: Maps a score to a [`Relevance`] band
//!
//! # Bands
//!
//! | Score | Label |
//! |-------|-------|
//! | `>= 50` | `EXTREMELY_RELEVANT` |
//! | `20 ..< 50` | `HIGHLY_RELEVANT` |
//! | `10 ..< 20` | `MODERATELY_RELEVANT` |
//! | `0 <..< 10` | `MINIMALLY_RELEVANT` |
//! | `0` | `NOT_RELEVANT` |

pub mod classify;
pub mod rules;
pub mod scorer;

pub use classify::{Relevance, classify};
pub use rules::{RuleBook, RuleOverrides};
pub use scorer::RelevanceScorer;
