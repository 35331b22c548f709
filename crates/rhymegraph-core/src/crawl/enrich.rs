//! Detail-page enrichment: one page per word, edges out of its rhyme table.

use std::sync::Arc;

use surrealdb::sql::Thing;

use super::{discover_word, CrawlError, Pacer};
use crate::fetch::PageFetcher;
use crate::graph::GraphDb;
use crate::oracle::Pronouncer;

/// Counters reported by an enrichment run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichStats {
    pub words_attempted: usize,
    pub pages_fetched: usize,
    pub edges_added: usize,
}

/// Fetches each word's rhyme detail page and records the listed rhymes
/// as edges. A word is attempted at most once, ever: the enriched flag
/// is set whether or not the page fetched or parsed.
pub struct Enricher {
    store: Arc<GraphDb>,
    fetcher: Arc<dyn PageFetcher>,
    dict: Arc<dyn Pronouncer>,
    base_url: String,
    batch_size: usize,
    pacer: Pacer,
}

impl Enricher {
    pub fn new(
        store: Arc<GraphDb>,
        fetcher: Arc<dyn PageFetcher>,
        dict: Arc<dyn Pronouncer>,
        base_url: impl Into<String>,
        batch_size: usize,
        pacer: Pacer,
    ) -> Self {
        Self {
            store,
            fetcher,
            dict,
            base_url: base_url.into(),
            batch_size: batch_size.max(1),
            pacer,
        }
    }

    /// Drain unenriched words batch by batch until none remain. Newly
    /// discovered rhyme targets join the queue and are drained too.
    pub async fn enrich_all(&mut self) -> Result<EnrichStats, CrawlError> {
        let mut stats = EnrichStats::default();
        loop {
            let batch = self.store.next_unenriched_batch(self.batch_size).await?;
            if batch.is_empty() {
                break;
            }
            println!("Enriching batch of {} words...", batch.len());
            for (id, text) in batch {
                self.enrich_word(&id, &text, &mut stats).await?;
            }
        }
        println!(
            "Enrichment done: {} words attempted, {} pages, {} new edges",
            stats.words_attempted, stats.pages_fetched, stats.edges_added
        );
        Ok(stats)
    }

    async fn enrich_word(
        &mut self,
        id: &Thing,
        text: &str,
        stats: &mut EnrichStats,
    ) -> Result<(), CrawlError> {
        stats.words_attempted += 1;
        self.pacer.wait().await;

        let url = format!("{}/rhyme/word/{}", self.base_url, text);
        let page = self.fetcher.fetch(&url).await;

        // The attempt counts regardless of the outcome; a missing or
        // malformed page is never retried.
        self.store.mark_enriched(id).await?;

        let Some(page) = page else {
            return Ok(());
        };
        stats.pages_fetched += 1;

        for row in page.rhyme_rows() {
            let (target, _) = discover_word(&self.store, self.dict.as_ref(), &row.word).await?;
            if let Some(display) = &row.pronunciation {
                self.store.backfill_pronunciation(&target, display).await?;
            }
            if self.store.add_edge(id, &target, row.score, false).await? {
                stats.edges_added += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::MockFetcher;
    use crate::oracle::CmuDict;

    async fn open_temp() -> (tempfile::TempDir, Arc<GraphDb>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = GraphDb::open(&dir.path().join("graph.db"))
            .await
            .expect("open db");
        db.initialize_schema().await.expect("initialize schema");
        (dir, Arc::new(db))
    }

    fn test_dict() -> Arc<CmuDict> {
        Arc::new(CmuDict::from_entries([
            ("cat", "K AE1 T"),
            ("bat", "B AE1 T"),
            ("hat", "HH AE1 T"),
        ]))
    }

    const CAT_PAGE: &str = r#"
<table>
  <tr><th>Word</th><th>Pronunciation</th><th>Score</th></tr>
  <tr><td>bat</td><td>b-at</td><td>95</td></tr>
  <tr><td>hat</td><td>h-at</td><td>bad</td></tr>
</table>"#;

    const BAT_PAGE: &str = r#"
<table>
  <tr><th>Word</th><th>Score</th></tr>
  <tr><td>cat</td><td>95</td></tr>
</table>"#;

    #[tokio::test]
    async fn test_enrich_all_drains_discovered_targets() {
        let (_dir, store) = open_temp().await;
        store.upsert_word("cat").await.unwrap();

        let fetcher = Arc::new(MockFetcher::new(&[
            ("http://test/rhyme/word/cat", CAT_PAGE),
            ("http://test/rhyme/word/bat", BAT_PAGE),
            // "hat" has no page: still marked enriched, no edges
        ]));
        let mut enricher = Enricher::new(
            store.clone(),
            fetcher,
            test_dict(),
            "http://test",
            100,
            Pacer::none(),
        );
        let stats = enricher.enrich_all().await.unwrap();

        // cat, then bat and hat discovered from cat's page.
        assert_eq!(stats.words_attempted, 3);
        assert_eq!(stats.pages_fetched, 2);
        // cat->bat, cat->hat, bat->cat; the pair is directional.
        assert_eq!(stats.edges_added, 3);

        let hat = store.find_word("hat").await.unwrap().unwrap();
        assert!(hat.enriched);
        assert_eq!(hat.pronunciation.as_deref(), Some("h-at"));

        let bat = store.find_word("bat").await.unwrap().unwrap();
        assert_eq!(bat.pronunciation.as_deref(), Some("b-at"));

        // Nothing left to do; a second run is a no-op.
        let stats = enricher.enrich_all().await.unwrap();
        assert_eq!(stats.words_attempted, 0);
    }

    #[tokio::test]
    async fn test_unparsable_score_stored_as_zero() {
        let (_dir, store) = open_temp().await;
        store.upsert_word("cat").await.unwrap();

        let fetcher = Arc::new(MockFetcher::new(&[(
            "http://test/rhyme/word/cat",
            CAT_PAGE,
        )]));
        let mut enricher = Enricher::new(
            store.clone(),
            fetcher,
            test_dict(),
            "http://test",
            100,
            Pacer::none(),
        );
        enricher.enrich_all().await.unwrap();

        let hat_id = store.find_word("hat").await.unwrap().unwrap().id.unwrap();
        let edges = store.all_edges().await.unwrap();
        let to_hat = edges
            .iter()
            .find(|e| e.target == hat_id.to_string())
            .unwrap();
        assert_eq!(to_hat.score, 0);
        assert!(!to_hat.is_perfect);
    }

    #[tokio::test]
    async fn test_failed_fetch_still_marks_enriched() {
        let (_dir, store) = open_temp().await;
        let (id, _) = store.upsert_word("orphan").await.unwrap();

        let fetcher = Arc::new(MockFetcher::new(&[]));
        let mut enricher = Enricher::new(
            store.clone(),
            fetcher,
            test_dict(),
            "http://test",
            100,
            Pacer::none(),
        );
        let stats = enricher.enrich_all().await.unwrap();

        assert_eq!(stats.words_attempted, 1);
        assert_eq!(stats.pages_fetched, 0);
        assert_eq!(stats.edges_added, 0);
        let _ = id;
        assert!(store.find_word("orphan").await.unwrap().unwrap().enriched);
    }
}
