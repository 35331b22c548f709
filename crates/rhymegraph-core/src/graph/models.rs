//! Record types stored in the rhyme graph.

use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

/// A unique, normalized surface form and its phonetic metadata.
///
/// A freshly discovered word carries no metadata at all; syllables,
/// phonemes and family key arrive with resolution, the pronunciation
/// display string opportunistically from a peer's detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRecord {
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    /// Normalized (trimmed, lowercased) surface form. Unique.
    pub text: String,
    /// Syllable count, unresolved until metadata is attached.
    #[serde(default)]
    pub syllables: Option<i64>,
    /// Space-joined phoneme sequence of the first known pronunciation.
    #[serde(default)]
    pub phonemes: Option<String>,
    /// Rhyming part of the pronunciation; words without one join no family.
    #[serde(default)]
    pub family_key: Option<String>,
    /// Display pronunciation, back-filled from detail pages.
    #[serde(default)]
    pub pronunciation: Option<String>,
    /// Set once the word's detail page has been attempted. Never reverts.
    pub enriched: bool,
    /// When the word was first discovered; orders enrichment batches.
    pub discovered_at: Datetime,
}

impl WordRecord {
    /// Create a bare record for a newly discovered surface form.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            syllables: None,
            phonemes: None,
            family_key: None,
            pronunciation: None,
            enriched: false,
            discovered_at: Datetime::from(chrono::Utc::now()),
        }
    }
}

/// A directed, deduplicated rhyme relation between two words.
/// Immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhymeEdgeRecord {
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    /// Record id of the source word, in `word:xxx` string form.
    pub source: String,
    /// Record id of the target word, in `word:xxx` string form.
    pub target: String,
    /// Scraped similarity score (0 when unavailable).
    pub score: i64,
    pub is_perfect: bool,
}

/// Derived per-family cache row. A convenience view, not authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub family_key: String,
    pub count: i64,
    /// First few member words, comma-joined.
    pub example_words: String,
}

/// Store counters, reported by the `stats` command.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub words: usize,
    pub enriched: usize,
    pub edges: usize,
    pub families: usize,
}
