//! Page fetching capability and the parsed-document view over fetched HTML.

mod http;
mod page;

pub use http::HttpFetcher;
pub use page::{ColumnRoles, Page, RhymeRow, TableShape};

use async_trait::async_trait;

/// Fetches and parses one page.
///
/// Implementations swallow transport failures: any network error or
/// non-success status yields `None`. Nothing past this boundary ever sees
/// a fetch error.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<Page>;
}
