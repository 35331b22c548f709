//! SurrealDB embedded store for the word/rhyme-edge graph.

use std::collections::HashMap;
use std::path::Path;

use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::sql::Thing;
use surrealdb::Surreal;

use super::error::GraphError;
use super::models::{FamilySummary, GraphStats, RhymeEdgeRecord, WordRecord};

/// Normalize a surface form: trim whitespace, lowercase.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Database handle for the rhyme graph.
pub struct GraphDb {
    db: Surreal<Db>,
}

impl GraphDb {
    /// Open or create a database at the given path.
    pub async fn open(path: &Path) -> Result<Self, GraphError> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns("rhymegraph").use_db("graph").await?;

        Ok(Self { db })
    }

    /// Initialize the schema. Tables are schemaless; the indexes carry the
    /// real invariants: word texts and (source, target) pairs are unique.
    pub async fn initialize_schema(&self) -> Result<(), GraphError> {
        self.db
            .query(
                r#"
                DEFINE TABLE word SCHEMALESS;
                DEFINE INDEX word_text ON word FIELDS text UNIQUE;
                DEFINE INDEX word_enriched ON word FIELDS enriched;
                "#,
            )
            .await?;

        self.db
            .query(
                r#"
                DEFINE TABLE rhyme_edge SCHEMALESS;
                DEFINE INDEX edge_pair ON rhyme_edge FIELDS source, target UNIQUE;
                DEFINE INDEX edge_source ON rhyme_edge FIELDS source;
                "#,
            )
            .await?;

        self.db
            .query(
                r#"
                DEFINE TABLE family_summary SCHEMALESS;
                DEFINE INDEX summary_key ON family_summary FIELDS family_key UNIQUE;
                "#,
            )
            .await?;

        self.db
            .query(
                r#"
                DEFINE TABLE metadata SCHEMALESS;
                DEFINE INDEX metadata_key ON metadata FIELDS key UNIQUE;
                INSERT INTO metadata { key: 'initialized', value: true };
                "#,
            )
            .await?;

        Ok(())
    }

    /// Check if the database has been initialized.
    pub async fn is_initialized(&self) -> Result<bool, GraphError> {
        let result: Option<serde_json::Value> = self
            .db
            .query("SELECT value FROM metadata WHERE key = 'initialized'")
            .await?
            .take(0)?;

        Ok(result.is_some())
    }

    /// Find a word by (normalized) text.
    pub async fn find_word(&self, text: &str) -> Result<Option<WordRecord>, GraphError> {
        let normalized = normalize(text);
        let word: Option<WordRecord> = self
            .db
            .query("SELECT * FROM word WHERE text = $text LIMIT 1")
            .bind(("text", normalized))
            .await?
            .take(0)?;
        Ok(word)
    }

    /// Insert the word if absent; return its id and whether it was created.
    ///
    /// Case and whitespace variants of the same text always resolve to the
    /// same record. A unique-index race on insert is benign: the existing
    /// record is re-selected and returned.
    pub async fn upsert_word(&self, text: &str) -> Result<(Thing, bool), GraphError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(GraphError::EmptyWord);
        }

        if let Some(id) = self.find_word(&normalized).await?.and_then(|w| w.id) {
            return Ok((id, false));
        }

        let record = WordRecord::new(normalized.clone());
        let created: Result<Option<WordRecord>, surrealdb::Error> =
            self.db.create("word").content(record).await;

        match created {
            Ok(word) => match word.and_then(|w| w.id) {
                Some(id) => Ok((id, true)),
                None => Err(GraphError::Database(format!(
                    "created word '{}' came back without an id",
                    normalized
                ))),
            },
            // Lost a race against another insert of the same text; the
            // record exists now, so hand that one back.
            Err(e) if is_unique_conflict(&e) => {
                match self.find_word(&normalized).await?.and_then(|w| w.id) {
                    Some(id) => Ok((id, false)),
                    None => Err(GraphError::Database(e.to_string())),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fill a word's phonetic metadata. Last write wins.
    pub async fn attach_metadata(
        &self,
        id: &Thing,
        syllables: u32,
        phonemes: Option<String>,
        family_key: Option<String>,
    ) -> Result<(), GraphError> {
        let query = format!(
            "UPDATE {} SET syllables = $syllables, phonemes = $phonemes, family_key = $family_key",
            id
        );
        self.db
            .query(&query)
            .bind(("syllables", syllables as i64))
            .bind(("phonemes", phonemes))
            .bind(("family_key", family_key))
            .await?;
        Ok(())
    }

    /// Back-fill the display pronunciation seen on a peer's detail page.
    pub async fn backfill_pronunciation(
        &self,
        id: &Thing,
        display: &str,
    ) -> Result<(), GraphError> {
        let query = format!("UPDATE {} SET pronunciation = $pronunciation", id);
        self.db
            .query(&query)
            .bind(("pronunciation", display.to_string()))
            .await?;
        Ok(())
    }

    /// Flag a word's detail page as attempted. Irreversible.
    pub async fn mark_enriched(&self, id: &Thing) -> Result<(), GraphError> {
        let query = format!("UPDATE {} SET enriched = true", id);
        self.db.query(&query).await?;
        Ok(())
    }

    /// Insert an edge if the (source, target) pair is new; returns whether
    /// a new edge was stored. Existing edges are never updated: a repeat
    /// insert is a no-op even with a different score.
    pub async fn add_edge(
        &self,
        source: &Thing,
        target: &Thing,
        score: i64,
        is_perfect: bool,
    ) -> Result<bool, GraphError> {
        let edge = RhymeEdgeRecord {
            id: None,
            source: source.to_string(),
            target: target.to_string(),
            score,
            is_perfect,
        };
        let created: Result<Option<RhymeEdgeRecord>, surrealdb::Error> =
            self.db.create("rhyme_edge").content(edge).await;

        match created {
            Ok(_) => Ok(true),
            Err(e) if is_unique_conflict(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Up to `limit` words whose detail page has not been attempted, in
    /// discovery order. Drives the resumable enrichment loop.
    pub async fn next_unenriched_batch(
        &self,
        limit: usize,
    ) -> Result<Vec<(Thing, String)>, GraphError> {
        let query = format!(
            "SELECT * FROM word WHERE enriched = false ORDER BY discovered_at ASC LIMIT {}",
            limit
        );
        let words: Vec<WordRecord> = self.db.query(&query).await?.take(0)?;
        Ok(words
            .into_iter()
            .filter_map(|w| w.id.map(|id| (id, w.text)))
            .collect())
    }

    /// Every stored word. The analysis pass works over this snapshot.
    pub async fn all_words(&self) -> Result<Vec<WordRecord>, GraphError> {
        let words: Vec<WordRecord> = self.db.query("SELECT * FROM word").await?.take(0)?;
        Ok(words)
    }

    /// Words that resolved into a rhyme family.
    pub async fn words_with_family(&self) -> Result<Vec<WordRecord>, GraphError> {
        let words: Vec<WordRecord> = self
            .db
            .query("SELECT * FROM word WHERE family_key != NONE")
            .await?
            .take(0)?;
        Ok(words)
    }

    /// Every stored edge.
    pub async fn all_edges(&self) -> Result<Vec<RhymeEdgeRecord>, GraphError> {
        let edges: Vec<RhymeEdgeRecord> =
            self.db.query("SELECT * FROM rhyme_edge").await?.take(0)?;
        Ok(edges)
    }

    /// Recompute the per-family count/example cache from current word
    /// state. Returns the number of families written.
    pub async fn rebuild_family_summaries(&self) -> Result<usize, GraphError> {
        let words = self.words_with_family().await?;

        let mut key_order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for word in words {
            if let Some(key) = word.family_key {
                if !groups.contains_key(&key) {
                    key_order.push(key.clone());
                }
                groups.entry(key).or_default().push(word.text);
            }
        }

        self.db.query("DELETE family_summary").await?;
        for key in &key_order {
            let members = &groups[key];
            let summary = FamilySummary {
                id: None,
                family_key: key.clone(),
                count: members.len() as i64,
                example_words: members
                    .iter()
                    .take(5)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            let _: Option<FamilySummary> =
                self.db.create("family_summary").content(summary).await?;
        }

        Ok(key_order.len())
    }

    /// Current family summaries, largest first.
    pub async fn family_summaries(&self) -> Result<Vec<FamilySummary>, GraphError> {
        let summaries: Vec<FamilySummary> = self
            .db
            .query("SELECT * FROM family_summary ORDER BY count DESC")
            .await?
            .take(0)?;
        Ok(summaries)
    }

    /// Store counters.
    pub async fn stats(&self) -> Result<GraphStats, GraphError> {
        Ok(GraphStats {
            words: self.count("SELECT count() FROM word GROUP ALL").await?,
            enriched: self
                .count("SELECT count() FROM word WHERE enriched = true GROUP ALL")
                .await?,
            edges: self
                .count("SELECT count() FROM rhyme_edge GROUP ALL")
                .await?,
            families: self
                .count("SELECT count() FROM family_summary GROUP ALL")
                .await?,
        })
    }

    async fn count(&self, query: &str) -> Result<usize, GraphError> {
        #[derive(serde::Deserialize)]
        struct CountResult {
            count: i64,
        }

        let result: Option<CountResult> = self.db.query(query).await?.take(0)?;
        Ok(result.map(|r| r.count as usize).unwrap_or(0))
    }
}

/// Whether a SurrealDB error is a unique-index violation. Those are benign
/// "already exists" outcomes for this store, never failures.
fn is_unique_conflict(err: &surrealdb::Error) -> bool {
    err.to_string().contains("already contains")
}
