//! External lookup capabilities: pronunciation and word frequency.
//!
//! Both are trait seams so the pipeline can run against fixtures in tests
//! and against real data files in production.

mod cmudict;
mod wordfreq;

pub use cmudict::CmuDict;
pub use wordfreq::ZipfTable;

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading oracle data files.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OracleError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OracleError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Pronunciation lookup.
pub trait Pronouncer: Send + Sync {
    /// All known pronunciations for a word, ordered by preference.
    /// May be empty.
    fn pronounce(&self, word: &str) -> Vec<Vec<String>>;

    /// Syllable count for a word. Never fails: unknown words get an
    /// estimate from spelling.
    fn syllables(&self, word: &str) -> u32;
}

/// Word-frequency lookup on the zipf scale (higher = more common).
pub trait FrequencyOracle: Send + Sync {
    /// Frequency of a word; a low constant for unknown words.
    fn frequency(&self, word: &str) -> f64;
}
