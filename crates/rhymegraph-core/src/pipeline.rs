//! Pipeline facade: wires the store, fetcher and oracles together and
//! exposes the phases the CLI drives.

use std::sync::Arc;

use thiserror::Error;

use crate::analysis::export::{write_audit_log, ExportError, RhymeLevels};
use crate::analysis::filter::{filter_family, FilterPolicy, RemovedWord};
use crate::analysis::{build_families, SyllableBucket};
use crate::config::Config;
use crate::crawl::{CrawlError, CrawlStats, EnrichStats, Enricher, IndexCrawler};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::graph::models::{FamilySummary, GraphStats};
use crate::graph::{GraphDb, GraphError};
use crate::oracle::{CmuDict, FrequencyOracle, OracleError, Pronouncer, ZipfTable};

/// Errors surfaced by pipeline phases.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of the analyze/filter/export phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeReport {
    /// Families exported across all buckets.
    pub families: usize,
    /// Members dropped by the frequency filter.
    pub removed: usize,
}

/// Owns the store and the external capabilities for one configured run.
pub struct Pipeline {
    config: Config,
    store: Arc<GraphDb>,
    fetcher: Arc<dyn PageFetcher>,
    dict: Arc<dyn Pronouncer>,
    frequency: Arc<dyn FrequencyOracle>,
}

impl Pipeline {
    /// Open the store and load the configured oracle data files. Oracle
    /// paths left unconfigured fall back to built-in behavior; configured
    /// paths that fail to load are errors.
    pub async fn open(config: Config) -> Result<Self, PipelineError> {
        std::fs::create_dir_all(&config.storage.data_dir)?;
        let store = Arc::new(GraphDb::open(&config.storage.db_path()).await?);

        let dict: Arc<dyn Pronouncer> = match &config.oracles.cmudict_path {
            Some(path) => {
                let dict = CmuDict::load(path)?;
                println!("Loaded {} dictionary words from {}", dict.len(), path.display());
                Arc::new(dict)
            }
            None => {
                eprintln!("Warning: no pronouncing dictionary configured; syllables will be estimated from spelling");
                Arc::new(CmuDict::empty())
            }
        };

        let frequency: Arc<dyn FrequencyOracle> = match &config.oracles.wordfreq_path {
            Some(path) => Arc::new(ZipfTable::load(path, crate::config::DEFAULT_UNKNOWN_ZIPF)?),
            None => {
                eprintln!("Warning: no frequency table configured; the frequency filter will keep every word");
                Arc::new(ZipfTable::passthrough())
            }
        };

        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.crawl.user_agent));

        Ok(Self {
            config,
            store,
            fetcher,
            dict,
            frequency,
        })
    }

    /// Assemble a pipeline from explicit components.
    pub fn with_components(
        config: Config,
        store: Arc<GraphDb>,
        fetcher: Arc<dyn PageFetcher>,
        dict: Arc<dyn Pronouncer>,
        frequency: Arc<dyn FrequencyOracle>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            dict,
            frequency,
        }
    }

    /// Define the store schema. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), PipelineError> {
        self.store.initialize_schema().await?;
        Ok(())
    }

    async fn ensure_initialized(&self) -> Result<(), PipelineError> {
        if !self.store.is_initialized().await? {
            return Err(GraphError::NotInitialized.into());
        }
        Ok(())
    }

    /// Phase 1: walk the alphabetical index and seed the word table.
    pub async fn crawl_index(&self) -> Result<CrawlStats, PipelineError> {
        self.ensure_initialized().await?;
        let mut crawler = IndexCrawler::new(
            self.store.clone(),
            self.fetcher.clone(),
            self.dict.clone(),
            self.config.crawl.base_url.clone(),
            self.config.crawl.pacer(),
        );
        Ok(crawler.crawl_alphabet(&self.config.crawl.alphabet).await?)
    }

    /// Crawl a single letter's index listing.
    pub async fn crawl_letter(&self, letter: char) -> Result<CrawlStats, PipelineError> {
        self.ensure_initialized().await?;
        let mut crawler = IndexCrawler::new(
            self.store.clone(),
            self.fetcher.clone(),
            self.dict.clone(),
            self.config.crawl.base_url.clone(),
            self.config.crawl.pacer(),
        );
        Ok(crawler.crawl_letter(letter).await?)
    }

    /// Phase 2: fetch detail pages and record rhyme edges.
    pub async fn enrich_details(&self) -> Result<EnrichStats, PipelineError> {
        self.ensure_initialized().await?;
        let mut enricher = Enricher::new(
            self.store.clone(),
            self.fetcher.clone(),
            self.dict.clone(),
            self.config.crawl.base_url.clone(),
            self.config.crawl.batch_size,
            self.config.crawl.pacer(),
        );
        Ok(enricher.enrich_all().await?)
    }

    /// Phase 3: rebuild summaries, cluster into families, frequency-filter
    /// the configured buckets and write the export artifact and audit log.
    pub async fn analyze_and_export(&self) -> Result<AnalyzeReport, PipelineError> {
        self.ensure_initialized().await?;

        let summaries = self.store.rebuild_family_summaries().await?;
        println!("Rebuilt {} family summaries", summaries);

        let words = self.store.all_words().await?;
        let edges = self.store.all_edges().await?;
        let policy = self.config.analysis.policy();
        let filter_policy = FilterPolicy {
            min_zipf: self.config.analysis.min_zipf,
            min_filtered_size: self.config.analysis.min_filtered_size,
        };

        let mut levels = RhymeLevels::default();
        let mut removed: Vec<RemovedWord> = Vec::new();
        for bucket in SyllableBucket::ALL {
            let families = build_families(&words, &edges, bucket, &policy);
            let out = levels.bucket_mut(bucket);
            if self.config.analysis.filter_buckets.contains(&bucket.floor()) {
                for family in families {
                    let outcome = filter_family(family, self.frequency.as_ref(), &filter_policy);
                    removed.extend(outcome.removed);
                    match outcome.kept {
                        Some(kept) => out.push(kept),
                        None => {
                            println!("Dropping a family: too few common words survive the frequency filter")
                        }
                    }
                }
            } else {
                *out = families;
            }
            println!("  {} syllable bucket: {} families", bucket.key(), out.len());
        }

        let export_path = self.config.storage.export_path();
        levels.save(&export_path)?;
        write_audit_log(&self.config.storage.audit_path(), &removed)?;
        println!(
            "Exported {} families to {}",
            levels.total_families(),
            export_path.display()
        );

        Ok(AnalyzeReport {
            families: levels.total_families(),
            removed: removed.len(),
        })
    }

    /// Run every phase in sequence.
    pub async fn run_all(&self) -> Result<AnalyzeReport, PipelineError> {
        println!("=== Phase 1: index crawl ===");
        self.crawl_index().await?;
        println!("=== Phase 2: detail enrichment ===");
        self.enrich_details().await?;
        println!("=== Phase 3: analysis and export ===");
        self.analyze_and_export().await
    }

    /// Store counters.
    pub async fn stats(&self) -> Result<GraphStats, PipelineError> {
        self.ensure_initialized().await?;
        Ok(self.store.stats().await?)
    }

    /// Cached family summary rows, largest first.
    pub async fn family_summaries(&self) -> Result<Vec<FamilySummary>, PipelineError> {
        self.ensure_initialized().await?;
        Ok(self.store.family_summaries().await?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::MockFetcher;

    const INDEX_C: &str = r#"
<a href="/rhyme/word/cat">cat</a>
<a href="/rhyme/word/bat">bat</a>
<a href="/rhyme/word/hat">hat</a>
<a href="/rhyme/word/scat">scat</a>"#;

    const CAT_PAGE: &str = r#"
<table>
  <tr><th>Word</th><th>Score</th></tr>
  <tr><td>bat</td><td>95</td></tr>
  <tr><td>hat</td><td>90</td></tr>
  <tr><td>scat</td><td>85</td></tr>
  <tr><td>cot</td><td>60</td></tr>
</table>"#;

    const BAT_PAGE: &str = r#"
<table>
  <tr><th>Word</th><th>Score</th></tr>
  <tr><td>cat</td><td>95</td></tr>
  <tr><td>cot</td><td>55</td></tr>
</table>"#;

    fn test_pipeline(
        dir: &tempfile::TempDir,
        store: Arc<GraphDb>,
        frequency: Arc<dyn FrequencyOracle>,
    ) -> Pipeline {
        let mut config = Config::default();
        config.crawl.base_url = "http://test".to_string();
        config.crawl.alphabet = "C".to_string();
        config.crawl.min_delay_ms = 0;
        config.crawl.max_delay_ms = 0;
        config.crawl.long_pause_every = 0;
        config.storage.data_dir = dir.path().join("data").to_string_lossy().into_owned();

        let fetcher = Arc::new(MockFetcher::new(&[
            ("http://test/rhyme/index/C", INDEX_C),
            ("http://test/rhyme/word/cat", CAT_PAGE),
            ("http://test/rhyme/word/bat", BAT_PAGE),
        ]));
        let dict = Arc::new(CmuDict::from_entries([
            ("cat", "K AE1 T"),
            ("bat", "B AE1 T"),
            ("hat", "HH AE1 T"),
            ("scat", "S K AE1 T"),
            ("cot", "K AA1 T"),
        ]));
        Pipeline::with_components(config, store, fetcher, dict, frequency)
    }

    fn scraped_frequencies() -> Arc<ZipfTable> {
        Arc::new(ZipfTable::from_pairs(
            [
                ("cat", 5.2),
                ("bat", 4.8),
                ("hat", 4.9),
                ("scat", 3.1),
                ("cot", 4.0),
            ],
            1.0,
        ))
    }

    #[tokio::test]
    async fn test_full_run_builds_the_cat_family() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            GraphDb::open(&dir.path().join("graph.db")).await.unwrap(),
        );
        let pipeline = test_pipeline(&dir, store.clone(), scraped_frequencies());
        pipeline.initialize().await.unwrap();

        let report = pipeline.run_all().await.unwrap();
        assert_eq!(report.families, 1);
        assert_eq!(report.removed, 0);

        let levels = RhymeLevels::load(&pipeline.config().storage.export_path()).unwrap();
        assert_eq!(levels.one.len(), 1);
        let family = &levels.one[0];
        assert_eq!(family.label, "CAT Family (-cat)");
        assert_eq!(family.count, 4);
        assert_eq!(family.words, vec!["cat", "bat", "hat", "scat"]);
        // Two members point at cot; it is the only neighbor.
        assert_eq!(family.slant_words, vec!["cot"]);

        let stats = pipeline.stats().await.unwrap();
        assert_eq!(stats.words, 5);
        assert_eq!(stats.enriched, 5);
        // cat: 4 edges, bat: 2 edges.
        assert_eq!(stats.edges, 6);
        // AE1 T and AA1 T both get a summary row.
        assert_eq!(stats.families, 2);
    }

    #[tokio::test]
    async fn test_analyze_without_frequency_table_keeps_families() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            GraphDb::open(&dir.path().join("graph.db")).await.unwrap(),
        );
        // No frequency data at all, the out-of-the-box setup.
        let pipeline = test_pipeline(&dir, store, Arc::new(ZipfTable::passthrough()));
        pipeline.initialize().await.unwrap();

        let report = pipeline.run_all().await.unwrap();
        assert_eq!(report.families, 1);
        assert_eq!(report.removed, 0);

        let levels = RhymeLevels::load(&pipeline.config().storage.export_path()).unwrap();
        assert_eq!(levels.one[0].count, 4);
        assert_eq!(levels.one[0].words, vec!["cat", "bat", "hat", "scat"]);
        // No removals means no audit log either.
        assert!(!pipeline.config().storage.audit_path().exists());
    }

    #[tokio::test]
    async fn test_phases_require_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            GraphDb::open(&dir.path().join("graph.db")).await.unwrap(),
        );
        let pipeline = test_pipeline(&dir, store, scraped_frequencies());

        let err = pipeline.crawl_index().await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Graph(GraphError::NotInitialized)
        ));
    }
}
