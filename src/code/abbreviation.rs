//! Product name → abbreviation lookup.
//!
//! The codec only consumes abbreviations; where they come from is up to the
//! caller. [`AbbreviationTable`] is the lookup used by the CLI: known names
//! map to their registered abbreviation, unknown names get a derived one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps a product name to the abbreviation printed in its batch codes.
pub trait AbbreviationLookup: Send + Sync {
    fn abbreviation_for(&self, product_name: &str) -> String;
}

/// Registered product abbreviations, keyed by product name.
///
/// Names match case-insensitively, ignoring surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationTable {
    entries: BTreeMap<String, String>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the abbreviation for `name`.
    pub fn insert(&mut self, name: impl Into<String>, abbreviation: impl Into<String>) {
        self.entries.insert(name.into(), abbreviation.into());
    }

    /// Registered abbreviation for `name`, without falling back.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl AbbreviationLookup for AbbreviationTable {
    fn abbreviation_for(&self, product_name: &str) -> String {
        match self.get(product_name) {
            Some(abbr) => abbr.to_string(),
            None => {
                let derived = derive_abbreviation(product_name);
                tracing::debug!(
                    product = product_name,
                    abbr = %derived,
                    "derived product abbreviation"
                );
                derived
            }
        }
    }
}

/// Derive an abbreviation from a product name.
///
/// Multi-word names use the initial of each word ("Gummy Bears" → "GB");
/// single-word names use their first three characters ("Chocolate" → "CHO").
/// Only ASCII alphanumerics survive, so the result never contains a separator.
pub fn derive_abbreviation(product_name: &str) -> String {
    let words: Vec<&str> = product_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    match words.as_slice() {
        [] => String::new(),
        [word] => word.chars().take(3).collect::<String>().to_ascii_uppercase(),
        words => words
            .iter()
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_ascii_uppercase(),
    }
}
