//! Weighted multi-category keyword scoring.
//!
//! The scorer is built once from a [`RuleBook`] and then shared freely: it
//! holds only compiled, immutable regexes, so concurrent calls never
//! interact.
//!
//! # Algorithm
//!
//! 1. Lowercase the text.
//! 2. If any exclusion pattern of the language matches anywhere, the result
//!    is a zero score with no matches, regardless of anything else.
//! 3. Otherwise every non-overlapping occurrence of every pattern in every
//!    scoring category adds the category weight to the total and emits a
//!    [`Match`]. Matches are ordered by category, then pattern, then
//!    position in the text.
//! 4. Categories with at least one occurrence get a [`CategoryBreakdown`].
//!
//! Patterns that overlap across categories are all counted: "heat stroke
//! death" scores both as `heat_illness` and as `primary_death`.

use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use super::rules::{CategoryRule, RuleBook, RuleSet};
use crate::error::RelevanceError;
use crate::models::{CategoryBreakdown, Language, Match, ScoreResult};

struct CompiledCategory {
    name: String,
    weight: i32,
    patterns: Vec<Regex>,
}

struct CompiledRuleSet {
    exclusions: Vec<Regex>,
    categories: Vec<CompiledCategory>,
}

/// Scores text against the keyword rules of a language.
pub struct RelevanceScorer {
    en: CompiledRuleSet,
    es: CompiledRuleSet,
}

impl RelevanceScorer {
    /// Compile a rule book.
    ///
    /// # Errors
    ///
    /// [`RelevanceError::InvalidPattern`] if a pattern is not a valid regex,
    /// [`RelevanceError::InvalidWeight`] if a scoring category has a weight
    /// below one.
    pub fn new(rules: &RuleBook) -> Result<Self, RelevanceError> {
        Ok(Self {
            en: compile_rule_set(Language::En, rules.get(Language::En))?,
            es: compile_rule_set(Language::Es, rules.get(Language::Es))?,
        })
    }

    fn rules(&self, language: Language) -> &CompiledRuleSet {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }

    /// Score `text` with the rule set of `language`.
    pub fn score(&self, text: &str, language: Language) -> ScoreResult {
        let rules = self.rules(language);
        let text = text.to_lowercase();

        if let Some(pattern) = rules.exclusions.iter().find(|re| re.is_match(&text)) {
            debug!(%language, pattern = pattern.as_str(), "Excluded by pattern");
            return ScoreResult::zero();
        }

        let mut total: i64 = 0;
        let mut matches: Vec<Match> = Vec::new();
        let mut categories = BTreeMap::new();

        for category in &rules.categories {
            let first = matches.len();
            for pattern in &category.patterns {
                matches.extend(pattern.find_iter(&text).map(|m| Match {
                    keyword: m.as_str().to_string(),
                    category: category.name.clone(),
                    weight: category.weight,
                }));
            }

            let found = &matches[first..];
            if found.is_empty() {
                continue;
            }

            let subtotal = found.len() as i64 * i64::from(category.weight);
            total += subtotal;
            let breakdown = CategoryBreakdown {
                matches: found.len(),
                unique_matches: found.iter().map(|m| m.keyword.as_str()).unique().count(),
                score: subtotal,
            };
            trace!(
                category = %category.name,
                matches = breakdown.matches,
                unique = breakdown.unique_matches,
                subtotal,
                "Category matched"
            );
            categories.insert(category.name.clone(), breakdown);
        }

        ScoreResult {
            score: total as f64,
            matches,
            categories,
        }
    }

    /// Score with a raw language tag, rejecting anything but `en`/`es`.
    pub fn score_tagged(&self, text: &str, tag: &str) -> Result<ScoreResult, RelevanceError> {
        let language: Language = tag.parse()?;
        Ok(self.score(text, language))
    }
}

fn compile_rule_set(language: Language, rules: &RuleSet) -> Result<CompiledRuleSet, RelevanceError> {
    let exclusions = match rules.exclusions() {
        Some(category) => compile_patterns(language, category)?,
        None => Vec::new(),
    };

    let categories = rules
        .scoring_categories()
        .map(|category| {
            if category.weight <= 0 {
                return Err(RelevanceError::InvalidWeight {
                    language,
                    category: category.name.clone(),
                    weight: category.weight,
                });
            }
            Ok(CompiledCategory {
                name: category.name.clone(),
                weight: category.weight,
                patterns: compile_patterns(language, category)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        %language,
        categories = categories.len(),
        exclusions = exclusions.len(),
        "Compiled rule set"
    );
    Ok(CompiledRuleSet {
        exclusions,
        categories,
    })
}

fn compile_patterns(language: Language, category: &CategoryRule) -> Result<Vec<Regex>, RelevanceError> {
    category
        .patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RelevanceError::InvalidPattern {
                    language,
                    category: category.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}
