// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Scrapes DuckDuckGo's HTML interface. No API key required.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult};

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
    timeout_ms: u64,
}

impl DuckDuckGoProvider {
    /// Create a new DuckDuckGo provider
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        Self::with_endpoint(DDG_HTML_URL, timeout)
    }

    /// Create a provider that posts to a custom endpoint
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        // Use a realistic browser User-Agent to avoid being blocked
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .map_err(|e| SearchError::ApiError {
                status: 0,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, self.timeout_ms))?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError {
                status: response.status().as_u16(),
                message: "DuckDuckGo request failed".to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_transport(e, self.timeout_ms))?;

        Ok(parse_ddg_html(&html, num_results))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Parse the DuckDuckGo HTML result page
///
/// Results are `.result` blocks holding an `a.result__a` title link and an
/// optional `.result__snippet`.
fn parse_ddg_html(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let (Ok(block_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&block_sel)
        .filter_map(|block| {
            let link = block.select(&link_sel).next()?;
            let url = extract_ddg_url(link.value().attr("href")?)?;
            let title = collapse_whitespace(&link.text().collect::<String>());
            let snippet = block
                .select(&snippet_sel)
                .next()
                .map(|s| collapse_whitespace(&s.text().collect::<String>()))
                .unwrap_or_default();

            Some(SearchResult {
                title,
                url,
                snippet,
                source: "duckduckgo".to_string(),
            })
        })
        .take(max_results)
        .collect()
}

/// Resolve DuckDuckGo's redirect link to the target URL
///
/// Links look like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
fn extract_ddg_url(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let base = Url::parse("https://duckduckgo.com").ok()?;
    let resolved = base.join(href).ok()?;
    resolved
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
