//! Keyword rule tables.
//!
//! Rules are plain data: an ordered list of categories per language, each
//! with a weight and an ordered list of regular-expression sources. The
//! scorer compiles them once at construction; nothing here is global or
//! mutable at runtime, so a rule book can be loaded from YAML, swapped in
//! tests, or extended without touching the scoring algorithm.
//!
//! Category order and pattern order are significant: they determine the
//! order of the [`Match`](crate::models::Match) records a scoring call emits.

use serde::{Deserialize, Serialize};

use crate::models::Language;

/// Name of the category that short-circuits scoring to zero.
pub const EXCLUSIONS: &str = "exclusions";

/// One keyword category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub weight: i32,
    pub patterns: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, weight: i32, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            weight,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn is_exclusion(&self) -> bool {
        self.name == EXCLUSIONS
    }
}

/// The ordered categories for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuleSet {
    pub categories: Vec<CategoryRule>,
}

impl RuleSet {
    /// Built-in English table.
    pub fn english() -> Self {
        Self {
            categories: vec![
                CategoryRule::new(
                    "primary_death",
                    10,
                    &[
                        r"heat\s+death",
                        r"heat[\s-]+related\s+death",
                        r"heat[\s-]+caused\s+death",
                        r"heat\s+fatality",
                        r"died\s+from\s+heat",
                        r"died\s+of\s+heat",
                        r"heat\s+exposure\s+death",
                        r"hyperthermia\s+death",
                        r"heat\s+stroke\s+death",
                        r"died\s+from\s+hyperthermia",
                        r"succumbed\s+to\s+heat",
                        r"heat\s+related\s+fatality",
                        r"heat\s+victim",
                        r"heat\s+casualty",
                    ],
                ),
                CategoryRule::new(
                    "heat_illness",
                    5,
                    &[
                        r"heat\s+stroke",
                        r"heat\s+exhaustion",
                        r"hyperthermia",
                        r"heat\s+illness",
                        r"heat\s+related\s+illness",
                        r"heat\s+emergency",
                        r"heat-associated",
                        r"severe\s+dehydration",
                    ],
                ),
                CategoryRule::new(
                    "contextual_death",
                    7,
                    &[
                        r"found\s+dead.*heat",
                        r"body\s+found.*heat",
                        r"unresponsive.*heat",
                        r"pronounced\s+dead.*heat",
                        r"died\s+after.*heat\s+wave",
                        r"succumbed.*heat",
                        r"extreme\s+heat.*died",
                    ],
                ),
                CategoryRule::new(
                    "environmental",
                    2,
                    &[
                        r"excessive\s+heat\s+warning",
                        r"heat\s+wave",
                        r"extreme\s+heat",
                        r"triple-digit\s+temperature",
                        r"record\s+heat",
                        r"blistering\s+heat",
                        r"record\s+breaking\s+heat",
                        r"dangerous\s+heat",
                        r"heat\s+advisory",
                        r"scorching\s+(?:heat|temperature)",
                        r"heat\s+claims\s+lives",
                        r"deadly\s+heat",
                        r"heat\s+turns\s+deadly",
                    ],
                ),
                CategoryRule::new(
                    "location_specific",
                    8,
                    &[
                        r"died\s+in\s+vehicle.*heat",
                        r"found\s+in\s+car.*heat",
                        r"outdoor\s+death.*heat",
                        r"homeless.*heat\s+death",
                        r"farm\s+worker.*heat\s+death",
                        r"agricultural\s+worker.*heat",
                        r"(?:air\s+conditioning|A/C)\s+failure.*death",
                        r"no\s+(?:A/C|air\s+conditioning).*death",
                        r"mobile\s+home.*heat\s+death",
                    ],
                ),
                CategoryRule::new(
                    "medical_coroner",
                    3,
                    &[
                        r"coroner.*heat",
                        r"medical\s+examiner.*heat",
                        r"autopsy.*heat",
                        r"cause\s+of\s+death.*heat",
                        r"heat\s+related\s+cause",
                        r"environmental\s+heat.*death",
                        r"heat\s+as\s+contributing\s+factor",
                    ],
                ),
                CategoryRule::new(
                    EXCLUSIONS,
                    -100,
                    &[
                        r"heated\s+argument",
                        r"heated\s+debate",
                        r"heat\s+of\s+the\s+moment",
                        r"preheat",
                        r"heat\s+pump",
                        r"heating\s+system",
                    ],
                ),
            ],
        }
    }

    /// Built-in Spanish table. It has no exclusions.
    pub fn spanish() -> Self {
        Self {
            categories: vec![
                CategoryRule::new(
                    "primary_death",
                    10,
                    &[
                        r"muerte\s+por\s+calor",
                        r"falleció\s+por\s+calor",
                        r"murió\s+por\s+calor",
                        r"sucumbió\s+por\s+calor",
                        r"falleció\s+por\s+el\s+calor",
                        r"hipertermia\s+fatal",
                    ],
                ),
                CategoryRule::new(
                    "heat_illness",
                    5,
                    &[
                        r"golpe\s+de\s+calor",
                        r"insolación",
                        r"hipertermia",
                        r"deshidratación\s+severa",
                        r"enfermedad\s+por\s+calor",
                    ],
                ),
                CategoryRule::new(
                    "environmental",
                    2,
                    &[
                        r"ola\s+de\s+calor",
                        r"calor\s+extremo",
                        r"temperatura\s+récord",
                        r"aviso\s+de\s+calor",
                        r"calor\s+peligroso",
                        r"calor\s+mortal",
                    ],
                ),
            ],
        }
    }

    /// The exclusion category, if this rule set has one.
    pub fn exclusions(&self) -> Option<&CategoryRule> {
        self.categories.iter().find(|c| c.is_exclusion())
    }

    /// Every category except exclusions, in table order.
    pub fn scoring_categories(&self) -> impl Iterator<Item = &CategoryRule> {
        self.categories.iter().filter(|c| !c.is_exclusion())
    }
}

/// One rule set per supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    pub en: RuleSet,
    pub es: RuleSet,
}

impl RuleBook {
    /// The built-in rule book.
    ///
    /// # Returns
    ///
    /// A `RuleBook` holding [`RuleSet::english`] and [`RuleSet::spanish`].
    /// Config overrides are applied on top with [`RuleBook::with_overrides`].
    pub fn builtin() -> Self {
        Self {
            en: RuleSet::english(),
            es: RuleSet::spanish(),
        }
    }

    pub fn get(&self, language: Language) -> &RuleSet {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }

    /// Replace the rule set of each language that has an override.
    ///
    /// An override swaps the whole rule set of its language; categories are
    /// not merged. Languages without an override keep their current table.
    ///
    /// # Arguments
    ///
    /// * `overrides` - Per-language replacements, usually from the config file
    ///
    /// # Returns
    ///
    /// The rule book with the overrides applied. Patterns and weights are not
    /// validated here; that happens when the scorer compiles the book.
    pub fn with_overrides(mut self, overrides: &RuleOverrides) -> Self {
        if let Some(en) = &overrides.en {
            self.en = en.clone();
        }
        if let Some(es) = &overrides.es {
            self.es = es.clone();
        }
        self
    }
}

/// Optional per-language replacements read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuleOverrides {
    #[serde(default)]
    pub en: Option<RuleSet>,
    #[serde(default)]
    pub es: Option<RuleSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_category_order() {
        let en = RuleSet::english();
        let names: Vec<&str> = en
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "primary_death",
                "heat_illness",
                "contextual_death",
                "environmental",
                "location_specific",
                "medical_coroner",
                "exclusions",
            ]
        );
    }

    #[test]
    fn test_exclusions_only_in_english() {
        let en = RuleSet::english();
        let exclusions = en.exclusions().unwrap();
        assert_eq!(exclusions.weight, -100);
        assert_eq!(exclusions.patterns.len(), 6);
        assert!(RuleSet::spanish().exclusions().is_none());
    }

    #[test]
    fn test_scoring_categories_skip_exclusions() {
        let en = RuleSet::english();
        assert_eq!(en.scoring_categories().count(), 6);
        assert!(en.scoring_categories().all(|c| c.name != EXCLUSIONS));
    }

    #[test]
    fn test_rule_book_lookup() {
        let book = RuleBook::builtin();
        assert_eq!(book.get(Language::En), &RuleSet::english());
        assert_eq!(book.get(Language::Es), &RuleSet::spanish());
    }

    #[test]
    fn test_overrides_replace_only_given_language() {
        let custom = RuleSet {
            categories: vec![CategoryRule::new("environmental", 4, &[r"calor"])],
        };
        let overrides = RuleOverrides {
            en: None,
            es: Some(custom.clone()),
        };
        let book = RuleBook::builtin().with_overrides(&overrides);
        assert_eq!(book.en, RuleSet::english());
        assert_eq!(book.es, custom);
    }

    #[test]
    fn test_rule_book_yaml_round_trip() {
        let yaml = serde_yaml::to_string(&RuleBook::builtin()).unwrap();
        assert!(yaml.contains("primary_death"));
        let parsed: RuleBook = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, RuleBook::builtin());
    }
}
