// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Article aggregation
//!
//! Fetches every candidate article and joins the successful ones into a
//! single delimited block of text for the prompt.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::search::content::PageFetcher;

/// Text used in place of articles when none are available
pub const NO_ARTICLES_SENTINEL: &str = "Answer Based On Your Knowledge Only";

/// Joined article text plus what it took to build it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedText {
    /// Delimited article blocks, or [`NO_ARTICLES_SENTINEL`]; never empty
    pub text: String,
    /// URLs a fetch was attempted for
    pub attempted: usize,
    /// URLs whose content made it into `text`
    pub fetched: usize,
}

impl AggregatedText {
    fn sentinel(attempted: usize) -> Self {
        Self {
            text: NO_ARTICLES_SENTINEL.to_string(),
            attempted,
            fetched: 0,
        }
    }

    /// True when no article content is available
    pub fn is_sentinel(&self) -> bool {
        self.fetched == 0
    }

    /// True when URLs were given but every fetch failed
    pub fn all_fetches_failed(&self) -> bool {
        self.attempted > 0 && self.fetched == 0
    }
}

/// Fetches articles and concatenates their content
pub struct ContentAggregator {
    fetcher: Arc<dyn PageFetcher>,
    concurrency: usize,
}

impl ContentAggregator {
    /// Create an aggregator that fetches one page at a time
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_concurrency(fetcher, 1)
    }

    /// Create an aggregator that keeps up to `concurrency` fetches in flight
    ///
    /// Blocks are still emitted in input order.
    pub fn with_concurrency(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch `urls` and join the successful articles
    ///
    /// Each URL is fetched at most once. Failed or empty fetches are logged
    /// and skipped; the surviving articles are numbered 1..k in input order.
    /// When nothing survives (including an empty `urls`), the text is
    /// [`NO_ARTICLES_SENTINEL`].
    pub async fn aggregate(&self, urls: &[String]) -> AggregatedText {
        if urls.is_empty() {
            debug!("No article URLs, using sentinel text");
            return AggregatedText::sentinel(0);
        }

        let contents: Vec<Option<String>> = stream::iter(urls.iter().cloned())
            .map(|url| {
                let fetcher = Arc::clone(&self.fetcher);
                async move {
                    match fetcher.fetch(&url).await {
                        Ok(content) if !content.trim().is_empty() => Some(content),
                        Ok(_) => {
                            warn!("Empty content for {}, skipping", url);
                            None
                        }
                        Err(e) => {
                            warn!("Error fetching content for {}: {}", url, e);
                            None
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut text = String::new();
        let mut fetched = 0;
        for content in contents.into_iter().flatten() {
            fetched += 1;
            text.push_str(&article_block(fetched, &content));
        }

        if fetched == 0 {
            warn!(
                "All {} article fetches failed, using sentinel text",
                urls.len()
            );
            return AggregatedText::sentinel(urls.len());
        }

        debug!("Aggregated {} of {} articles", fetched, urls.len());

        AggregatedText {
            text,
            attempted: urls.len(),
            fetched,
        }
    }
}

/// Wrap one article's content in its numbered markers
pub fn article_block(index: usize, content: &str) -> String {
    format!(
        "\n\n### Article {index}\n\n{content}\n\n### End of Article {index}\n\n"
    )
}
