use crate::error::{Error, Result};
use crate::extractor::{NoiseRule, NoiseRules, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// On-disk form of an ordered noise rule list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseRuleConfig {
    pub version: u32,
    #[serde(default = "default_separator")]
    pub separator: String,
    pub rules: Vec<NoiseRule>,
}

fn default_separator() -> String {
    SEPARATOR.to_string()
}

impl NoiseRuleConfig {
    /// Load a rule list from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read noise rules from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: NoiseRuleConfig = serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse noise rules from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported noise rules version: {}. Expected version 1",
                self.version
            )));
        }

        if self.separator.is_empty() {
            return Err(Error::Config("Separator cannot be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(Error::Config(format!(
                    "Rule #{} has an empty pattern",
                    index + 1
                )));
            }
            if !seen.insert(rule.pattern.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate noise pattern: {:?}",
                    rule.pattern
                )));
            }
        }

        Ok(())
    }

    pub fn into_rules(self) -> NoiseRules {
        NoiseRules::new(self.separator, self.rules)
    }
}

/// Rules from `path` when given, built-in rules otherwise
pub fn load_noise_rules(path: Option<&Path>) -> Result<NoiseRules> {
    match path {
        Some(path) => Ok(NoiseRuleConfig::from_file(path)?.into_rules()),
        None => Ok(NoiseRules::default()),
    }
}
