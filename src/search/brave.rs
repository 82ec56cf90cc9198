// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Brave Search API provider
//!
//! Selected with `SEARCH_PROVIDER=brave`; needs `BRAVE_API_KEY`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult};

const BRAVE_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Brave caps `count` at 20
const MAX_COUNT: usize = 20;

/// Brave Search API provider
pub struct BraveSearchProvider {
    api_key: String,
    endpoint: String,
    client: Client,
    timeout_ms: u64,
}

impl BraveSearchProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, BRAVE_API_URL, timeout)
    }

    /// Create a provider that talks to a custom endpoint
    pub fn with_endpoint(
        api_key: String,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::ApiError {
                status: 0,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            api_key,
            endpoint: endpoint.to_string(),
            client,
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

#[async_trait]
impl SearchProvider for BraveSearchProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let count = num_results.min(MAX_COUNT).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, self.timeout_ms))?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(SearchError::NoApiKey {
                provider: "brave".to_string(),
            });
        }
        if !status.is_success() {
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: BraveResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                provider: "brave".to_string(),
                message: e.to_string(),
            })?;

        Ok(body.into_results())
    }

    fn name(&self) -> &'static str {
        "brave"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveHit>,
}

#[derive(Debug, Deserialize)]
struct BraveHit {
    #[serde(default)]
    title: String,
    url: Option<String>,
    #[serde(default)]
    description: String,
}

impl BraveResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.web
            .unwrap_or_default()
            .results
            .into_iter()
            .filter_map(|hit| {
                Some(SearchResult {
                    url: hit.url?,
                    title: hit.title,
                    snippet: hit.description,
                    source: "brave".to_string(),
                })
            })
            .collect()
    }
}
