// Ingredient recognition over free-text ingredient lists

pub mod rules;

pub use rules::{NoiseRule, NoiseRules, SEPARATOR};

use crate::vocabulary::{title_case, Vocabulary};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Recognizes known ingredient names in rich-text ingredient lists.
///
/// The pipeline is: strip noise with the ordered [`NoiseRules`], title-case the
/// whole text, split on the separator, trim each candidate, keep the
/// candidates the vocabulary holds exactly. Never fails; unrecognized text is
/// dropped.
#[derive(Debug, Clone)]
pub struct IngredientExtractor {
    vocabulary: Arc<Vocabulary>,
    rules: NoiseRules,
}

impl IngredientExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>, rules: NoiseRules) -> Self {
        Self { vocabulary, rules }
    }

    /// Extractor using the built-in noise rules
    pub fn with_default_rules(vocabulary: Arc<Vocabulary>) -> Self {
        Self::new(vocabulary, NoiseRules::default())
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub fn rules(&self) -> &NoiseRules {
        &self.rules
    }

    /// Candidate names in text order, before matching. Blank candidates are
    /// left out.
    pub fn candidates(&self, raw_text: &str) -> Vec<String> {
        let stripped = self.rules.apply(raw_text);
        let canonical = title_case(&stripped);

        canonical
            .split(self.rules.separator())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Canonical names of every recognized ingredient, each once
    pub fn extract(&self, raw_text: &str) -> BTreeSet<String> {
        // One snapshot for the whole extraction
        let index = self.vocabulary.snapshot();

        let mut recognized = BTreeSet::new();
        for candidate in self.candidates(raw_text) {
            if index.contains_exact(&candidate) {
                recognized.insert(candidate);
            } else {
                debug!("Unrecognized ingredient candidate: {:?}", candidate);
            }
        }

        debug!("Recognized {} ingredients", recognized.len());
        recognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor_with(names: &[&str]) -> IngredientExtractor {
        let vocab = Arc::new(Vocabulary::new());
        vocab.insert_many(names);
        IngredientExtractor::with_default_rules(vocab)
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_strips_markup_and_qualifiers() {
        let extractor = extractor_with(&["Chicken Breast"]);
        assert_eq!(
            extractor.extract("<ul><li>grated Chicken Breast</li></ul>"),
            set(&["Chicken Breast"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let extractor = extractor_with(&["Chicken"]);
        assert_eq!(extractor.extract("Chicken, Chicken"), set(&["Chicken"]));
    }

    #[test]
    fn test_no_partial_match() {
        let extractor = extractor_with(&["Chicken"]);
        assert!(extractor.extract("Chick").is_empty());
        assert!(extractor.extract("Chickens").is_empty());
    }

    #[test]
    fn test_empty_vocabulary() {
        let extractor = extractor_with(&[]);
        assert!(extractor
            .extract("<ul><li>Salt</li><li>Pepper</li></ul>")
            .is_empty());
    }

    #[test]
    fn test_case_is_canonicalized_before_matching() {
        let extractor = extractor_with(&["olive oil", "sea salt"]);
        assert_eq!(
            extractor.extract("<p>OLIVE OIL; sea salt</p>"),
            set(&["Olive Oil", "Sea Salt"])
        );
    }

    #[test]
    fn test_ligatures_match_plain_names() {
        let extractor = extractor_with(&["Flour", "Fig Jam"]);
        assert_eq!(
            extractor.extract("<li>\u{fb02}our</li><li>\u{fb01}g jam</li>"),
            set(&["Fig Jam", "Flour"])
        );
    }

    #[test]
    fn test_rich_text_list() {
        let extractor = extractor_with(&["Chicken Breast", "Garlic", "Olive Oil", "Lemon Juice", "Salt"]);
        let text = "<ul>\r\n<li>2 skinless Chicken Breast</li>\r\n<li>garlic (minced)</li>\r\n\
                    <li>olive oil &amp; lemon juice</li>\r\n<li>kosher salt</li>\r\n</ul>";

        // "minced" is followed by a separator, not a space, so it stays a candidate
        assert!(extractor.candidates(text).contains(&"Minced".to_string()));
        assert_eq!(
            extractor.extract(text),
            set(&["Chicken Breast", "Garlic", "Lemon Juice", "Olive Oil", "Salt"])
        );
    }

    #[test]
    fn test_candidates_are_trimmed_and_ordered() {
        let extractor = extractor_with(&[]);
        assert_eq!(
            extractor.candidates("<li> sliced onion </li><li>  </li><li>Basil</li>"),
            vec!["Onion", "Basil"]
        );
    }

    #[test]
    fn test_blank_candidates_never_match_empty_name() {
        let vocab = Arc::new(Vocabulary::new());
        vocab.insert("");
        let extractor = IngredientExtractor::with_default_rules(vocab);
        assert!(extractor.extract("<li></li>; ,").is_empty());
    }

    #[test]
    fn test_vocabulary_growth_is_visible() {
        let extractor = extractor_with(&["Salt"]);
        assert_eq!(extractor.extract("salt, thyme"), set(&["Salt"]));

        extractor.vocabulary().insert("thyme");
        assert_eq!(extractor.extract("salt, thyme"), set(&["Salt", "Thyme"]));
    }

    #[test]
    fn test_custom_rules() {
        let vocab = Arc::new(Vocabulary::new());
        vocab.insert("Green Onion");
        let rules = NoiseRules::new("|", vec![NoiseRule::replace("scallions", "green onion")]);
        let extractor = IngredientExtractor::new(vocab, rules);

        assert_eq!(extractor.extract("scallions"), set(&["Green Onion"]));
        // Default rules are not in effect
        assert!(extractor.extract("<li>green onion</li>").is_empty());
    }
}
