//! HTTP page fetcher backed by reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{Page, PageFetcher};

/// Production page fetcher.
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Creates a fetcher sending the given User-Agent with every request.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<Page> {
        let response = match self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Warning: failed to fetch {}: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // Missing pages are routine; skip without noise.
            return None;
        }
        if !status.is_success() {
            eprintln!("Warning: {} returned {}", url, status);
            return None;
        }

        match response.text().await {
            Ok(body) => Some(Page::parse(&body)),
            Err(e) => {
                eprintln!("Warning: failed to read body of {}: {}", url, e);
                None
            }
        }
    }
}
