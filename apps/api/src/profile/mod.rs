//! Profile Store: the operator's prepared interview answers.
//!
//! Loaded once at startup (from `PROFILE_PATH` or the built-in default), then
//! shared read-only behind an `Arc` for the life of the process.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub mod handlers;

const DEFAULT_PROFILE_JSON: &str = include_str!("default_profile.json");

/// A prepared answer for one category of interview question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreparedAnswer {
    /// snake_case category key, e.g. `superpower`.
    pub category: String,
    /// Lowercase phrases that mark a question as belonging to this category.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub experience: String,
    pub answers: Vec<PreparedAnswer>,
}

impl Profile {
    /// Loads and validates a profile from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid profile file {}", path.display()))
    }

    /// The profile compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_PROFILE_JSON).context("Built-in profile is invalid")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    fn from_json(raw: &str) -> Result<Self> {
        let mut profile: Profile = serde_json::from_str(raw)?;
        for answer in &mut profile.answers {
            answer.keywords = answer
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("profile name cannot be empty");
        }
        if self.answers.is_empty() {
            bail!("profile must contain at least one prepared answer");
        }
        let mut seen = HashSet::new();
        for answer in &self.answers {
            if answer.category.trim().is_empty() {
                bail!("prepared answer category cannot be empty");
            }
            if !seen.insert(answer.category.as_str()) {
                bail!("duplicate prepared answer category '{}'", answer.category);
            }
            if answer.answer.trim().is_empty() {
                bail!("prepared answer for '{}' is empty", answer.category);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<&PreparedAnswer> {
        self.answers.iter().find(|a| a.category == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.answers.iter().map(|a| a.category.as_str())
    }

    /// Returns the first prepared answer, in profile order, whose category name
    /// or keywords appear in the question as whole words.
    pub fn relevant_answer(&self, question: &str) -> Option<&PreparedAnswer> {
        let question = words(question);
        self.answers.iter().find(|a| {
            contains_phrase(&question, &words(&a.category))
                || a.keywords.iter().any(|k| contains_phrase(&question, &words(k)))
        })
    }
}

/// Lowercase alphanumeric runs; `_` and punctuation separate words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(haystack: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && haystack.windows(phrase.len()).any(|w| w == phrase)
}
