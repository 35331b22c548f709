//! CMU pronouncing dictionary loader.

use std::collections::HashMap;
use std::path::Path;

use super::{OracleError, Pronouncer};
use crate::phonetics;

/// In-memory CMU pronouncing dictionary.
///
/// Parses the plain `cmudict.dict` format: one pronunciation per line as
/// `word PH ON EM ES`, alternates marked `word(2)`, comment lines starting
/// with `;;;`. Alternates are kept in file order after the first.
pub struct CmuDict {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl CmuDict {
    /// Load a dictionary file.
    pub fn load(path: &Path) -> Result<Self, OracleError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OracleError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    /// An empty dictionary: every lookup falls back to spelling estimates.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build a dictionary from `(word, "PH ON EMES")` pairs. Test fixtures
    /// mostly, but also handy for seeding.
    pub fn from_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for (word, phones) in pairs {
            let phones: Vec<String> =
                phones.split_whitespace().map(|p| p.to_string()).collect();
            if phones.is_empty() {
                continue;
            }
            entries.entry(word.to_lowercase()).or_default().push(phones);
        }
        Self { entries }
    }

    fn parse(content: &str) -> Self {
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(head) = parts.next() else { continue };
            // "word(2)" marks an alternate pronunciation of "word"
            let word = head.split('(').next().unwrap_or(head).to_lowercase();
            let phones: Vec<String> = parts
                .take_while(|p| !p.starts_with('#'))
                .map(|p| p.to_uppercase())
                .collect();
            if word.is_empty() || phones.is_empty() {
                continue;
            }
            entries.entry(word).or_default().push(phones);
        }
        Self { entries }
    }

    /// Number of distinct words loaded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Pronouncer for CmuDict {
    fn pronounce(&self, word: &str) -> Vec<Vec<String>> {
        self.entries
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn syllables(&self, word: &str) -> u32 {
        match self.pronounce(word).first() {
            Some(phones) => phonetics::syllable_count(phones).max(1),
            None => phonetics::estimate_syllables(word),
        }
    }
}
