//! Index crawling and detail-page enrichment.
//!
//! Both passes are resumable: crawl state is the word table itself, and
//! the enrichment loop is driven by the store's unenriched batches, so a
//! killed run picks up where it left off.

mod enrich;
mod pacing;

pub use enrich::{EnrichStats, Enricher};
pub use pacing::Pacer;

use std::sync::Arc;

use surrealdb::sql::Thing;
use thiserror::Error;

use crate::fetch::PageFetcher;
use crate::graph::{normalize, GraphDb, GraphError};
use crate::oracle::Pronouncer;
use crate::phonetics;

/// Errors from the crawl passes.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Counters reported by an index crawl.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub words_discovered: usize,
}

/// Walks the site's alphabetical word index and seeds the word table.
pub struct IndexCrawler {
    store: Arc<GraphDb>,
    fetcher: Arc<dyn PageFetcher>,
    dict: Arc<dyn Pronouncer>,
    base_url: String,
    pacer: Pacer,
}

impl IndexCrawler {
    pub fn new(
        store: Arc<GraphDb>,
        fetcher: Arc<dyn PageFetcher>,
        dict: Arc<dyn Pronouncer>,
        base_url: impl Into<String>,
        pacer: Pacer,
    ) -> Self {
        Self {
            store,
            fetcher,
            dict,
            base_url: base_url.into(),
            pacer,
        }
    }

    /// Crawl the index for every letter in `alphabet`.
    pub async fn crawl_alphabet(&mut self, alphabet: &str) -> Result<CrawlStats, CrawlError> {
        let mut total = CrawlStats::default();
        for letter in alphabet.chars() {
            let stats = self.crawl_letter(letter).await?;
            total.pages_fetched += stats.pages_fetched;
            total.words_discovered += stats.words_discovered;
        }
        println!(
            "Index crawl done: {} new words from {} pages",
            total.words_discovered, total.pages_fetched
        );
        Ok(total)
    }

    /// Crawl one letter's index pages until a fetch fails, a page carries
    /// no word links, or there is no next-page affordance.
    pub async fn crawl_letter(&mut self, letter: char) -> Result<CrawlStats, CrawlError> {
        let mut stats = CrawlStats::default();
        let mut page_no = 1u32;

        loop {
            let url = if page_no == 1 {
                format!("{}/rhyme/index/{}", self.base_url, letter)
            } else {
                format!("{}/rhyme/index/{}/{}", self.base_url, letter, page_no)
            };

            self.pacer.wait().await;
            let Some(page) = self.fetcher.fetch(&url).await else {
                break;
            };
            stats.pages_fetched += 1;

            let links = page.word_links();
            if links.is_empty() {
                break;
            }
            for link in &links {
                let (_, created) = discover_word(&self.store, self.dict.as_ref(), link).await?;
                if created {
                    stats.words_discovered += 1;
                }
            }

            if !page.has_next_page() {
                break;
            }
            page_no += 1;
        }

        println!(
            "  {}: {} new words ({} pages)",
            letter, stats.words_discovered, stats.pages_fetched
        );
        Ok(stats)
    }
}

/// Upsert a surface form and, on first sight, attach its phonetic
/// metadata. Resolution happens exactly once per word.
pub(crate) async fn discover_word(
    store: &GraphDb,
    dict: &dyn Pronouncer,
    text: &str,
) -> Result<(Thing, bool), GraphError> {
    let (id, created) = store.upsert_word(text).await?;
    if created {
        let normalized = normalize(text);
        let resolved = phonetics::resolve(&dict.pronounce(&normalized), &normalized);
        store
            .attach_metadata(
                &id,
                resolved.syllables,
                resolved.phonemes,
                resolved.family_key,
            )
            .await?;
    }
    Ok((id, created))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::fetch::{Page, PageFetcher};

    /// Serves canned HTML by exact URL; anything else is a miss.
    pub struct MockFetcher {
        pages: HashMap<String, String>,
    }

    impl MockFetcher {
        pub fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Option<Page> {
            self.pages.get(url).map(|html| Page::parse(html))
        }
    }
}
