//! Restricted-content classification.
//!
//! A single case-insensitive regex built once at startup from the
//! configured vocabulary. Matching is pure and deterministic; an empty
//! body never matches.

use regex::{Regex, RegexBuilder};

use crate::config::ClassifierConfig;
use crate::error::ConfigError;

/// Stateless predicate over a message body.
#[derive(Debug)]
pub struct ContentClassifier {
    pattern: Option<Regex>,
}

impl ContentClassifier {
    /// Build the classifier from configuration.
    ///
    /// Literal words are escaped and anchored on word boundaries; raw
    /// patterns are taken as-is. An invalid pattern is a startup error,
    /// not something to limp along with.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let mut alternatives: Vec<String> = config
            .words
            .iter()
            .filter(|w| !w.trim().is_empty())
            .map(|w| format!(r"\b{}\b", regex::escape(w.trim())))
            .collect();
        alternatives.extend(config.patterns.iter().cloned());

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Does `body` match a restricted-content pattern?
    pub fn is_restricted(&self, body: &str) -> bool {
        if body.is_empty() {
            return false;
        }
        self.pattern.as_ref().is_some_and(|p| p.is_match(body))
    }
}
