use serde::{Deserialize, Serialize};

/// Token that noise is replaced with before segmentation (ASCII unit separator)
pub const SEPARATOR: &str = "\u{1f}";

/// List markup emitted by the rich-text editor
const MARKUP: &[&str] = &[
    "<ul>", "</ul>", "<ol>", "</ol>", "<li>", "</li>", "<p>", "</p>", "<br />", "<br/>", "<br>",
];

/// Entities and their decoded glyphs. `&amp;` must stay ahead of the bare `&`
/// punctuation rule.
const ENTITIES: &[&str] = &[
    "&nbsp;", "\u{a0}", "&frac12;", "&frac14;", "&frac34;", "\u{bd}", "\u{bc}", "\u{be}",
    "&rsquo;", "&lsquo;", "&rdquo;", "&ldquo;", "&quot;", "&#39;", "\u{2019}", "\u{2018}",
    "\u{201d}", "\u{201c}", "&amp;",
];

const PUNCTUATION: &[&str] = &[";", ", ", " (", ")", "&"];

/// Longest variant first so `\r\n` collapses to a single separator
const LINE_BREAKS: &[&str] = &["\r\n", "\n", "\r"];

/// Quantity and preparation words. Each is stripped in lower and capitalized
/// form; `cup` has no trailing space and also eats the `cup` of `cups`.
const QUALIFIERS: &[&str] = &[
    "grated ",
    "shredded ",
    "sliced ",
    "diced ",
    "chopped ",
    "minced ",
    "crushed ",
    "skinless ",
    "boneless ",
    "cooked ",
    "fresh ",
    "ground ",
    "kosher ",
    "large ",
    "medium ",
    "small ",
    "jar ",
    "tablespoons ",
    "tablespoon ",
    "teaspoons ",
    "teaspoon ",
    "cup",
];

/// One literal substitution step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseRule {
    pub pattern: String,
    /// Text substituted for every occurrence; `None` means the separator
    #[serde(default)]
    pub replacement: Option<String>,
}

impl NoiseRule {
    /// Rule replacing `pattern` with the separator
    pub fn strip(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: None,
        }
    }

    pub fn replace(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: Some(replacement.into()),
        }
    }
}

/// Ordered list of literal substitutions applied to raw ingredient text.
///
/// Rules run one after another over the whole text; a rule sees the output of
/// every rule before it. Empty patterns are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseRules {
    separator: String,
    rules: Vec<NoiseRule>,
}

impl Default for NoiseRules {
    fn default() -> Self {
        let mut rules: Vec<NoiseRule> = MARKUP
            .iter()
            .chain(ENTITIES)
            .chain(PUNCTUATION)
            .chain(LINE_BREAKS)
            .map(|p| NoiseRule::strip(*p))
            .collect();

        for word in QUALIFIERS {
            rules.push(NoiseRule::strip(*word));
            rules.push(NoiseRule::strip(capitalize(word)));
        }

        Self {
            separator: SEPARATOR.to_string(),
            rules,
        }
    }
}

impl NoiseRules {
    pub fn new(separator: impl Into<String>, rules: Vec<NoiseRule>) -> Self {
        Self {
            separator: separator.into(),
            rules,
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn rules(&self) -> &[NoiseRule] {
        &self.rules
    }

    /// Run every rule in order
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            if rule.pattern.is_empty() || !out.contains(rule.pattern.as_str()) {
                continue;
            }
            let replacement = rule.replacement.as_deref().unwrap_or(self.separator.as_str());
            out = out.replace(rule.pattern.as_str(), replacement);
        }
        out
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
