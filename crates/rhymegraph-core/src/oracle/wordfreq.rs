//! Word-frequency table on the zipf scale.

use std::collections::HashMap;
use std::path::Path;

use super::{FrequencyOracle, OracleError};

/// Frequency table loaded from a `word<TAB>zipf` file (whitespace also
/// accepted). Words missing from the table get a fixed low score.
pub struct ZipfTable {
    table: HashMap<String, f64>,
    unknown: f64,
}

impl ZipfTable {
    /// Load a frequency table file.
    pub fn load(path: &Path, unknown: f64) -> Result<Self, OracleError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OracleError::io(path, e))?;
        let mut table = HashMap::new();
        for line in content.lines() {
            let mut parts = line.split_whitespace();
            let (Some(word), Some(score)) = (parts.next(), parts.next()) else {
                continue;
            };
            let Ok(score) = score.parse::<f64>() else { continue };
            table.insert(word.to_lowercase(), score);
        }
        Ok(Self { table, unknown })
    }

    /// An empty table: every word scores as unknown.
    pub fn empty(unknown: f64) -> Self {
        Self {
            table: HashMap::new(),
            unknown,
        }
    }

    /// A table that scores every word above any obscurity threshold, so
    /// the frequency filter keeps everything. Used when no table is
    /// configured.
    pub fn passthrough() -> Self {
        Self::empty(f64::INFINITY)
    }

    /// Build a table from pairs, for tests and seeding.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
        unknown: f64,
    ) -> Self {
        let table = pairs
            .into_iter()
            .map(|(w, f)| (w.to_lowercase(), f))
            .collect();
        Self { table, unknown }
    }
}

impl FrequencyOracle for ZipfTable {
    fn frequency(&self, word: &str) -> f64 {
        self.table
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(self.unknown)
    }
}
