//! JSON export of the ranked families and the filter audit log.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::filter::RemovedWord;
use super::{RhymeFamily, SyllableBucket};

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The export artifact: ranked families keyed by syllable bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RhymeLevels {
    #[serde(rename = "1")]
    pub one: Vec<RhymeFamily>,

    #[serde(rename = "2")]
    pub two: Vec<RhymeFamily>,

    #[serde(rename = "3")]
    pub three: Vec<RhymeFamily>,

    #[serde(rename = "4_plus")]
    pub four_plus: Vec<RhymeFamily>,
}

impl RhymeLevels {
    pub fn bucket_mut(&mut self, bucket: SyllableBucket) -> &mut Vec<RhymeFamily> {
        match bucket {
            SyllableBucket::One => &mut self.one,
            SyllableBucket::Two => &mut self.two,
            SyllableBucket::Three => &mut self.three,
            SyllableBucket::FourPlus => &mut self.four_plus,
        }
    }

    pub fn total_families(&self) -> usize {
        self.one.len() + self.two.len() + self.three.len() + self.four_plus.len()
    }

    /// Write the document as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a previously exported document.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Append the filter's removals to the plain-text audit log, one
/// `word<TAB>zipf` line per removal under a dated run header.
pub fn write_audit_log(path: &Path, removed: &[RemovedWord]) -> Result<(), ExportError> {
    if removed.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(
        file,
        "# {} filtered {} words",
        chrono::Utc::now().to_rfc3339(),
        removed.len()
    )?;
    for entry in removed {
        writeln!(file, "{}\t{:.2}", entry.word, entry.zipf)?;
    }
    Ok(())
}
