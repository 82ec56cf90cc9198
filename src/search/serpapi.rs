// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SerpAPI search provider
//!
//! Queries Google through SerpAPI. This is the default provider.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult};

const SERPAPI_URL: &str = "https://serpapi.com/search";

/// SerpAPI (Google engine) provider
pub struct SerpApiProvider {
    api_key: String,
    endpoint: String,
    client: Client,
    timeout_ms: u64,
}

impl SerpApiProvider {
    /// Create a new SerpAPI provider
    ///
    /// # Arguments
    /// * `api_key` - SerpAPI key
    /// * `timeout` - Request timeout
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, SERPAPI_URL, timeout)
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
impl SearchProvider for SerpApiProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
                ("num", &num_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, self.timeout_ms))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(SearchError::NoApiKey {
                provider: "serpapi".to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: SerpApiResponse =
            response
                .json()
                .await
                .map_err(|e| SearchError::InvalidResponse {
                    provider: "serpapi".to_string(),
                    message: e.to_string(),
                })?;

        Ok(data.into_results())
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, serde::Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Debug, serde::Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    link: Option<String>,
    #[serde(default)]
    snippet: String,
}

impl SerpApiResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.organic_results
            .into_iter()
            .filter_map(|r| {
                let url = r.link?;
                Some(SearchResult {
                    title: r.title,
                    url,
                    snippet: r.snippet,
                    source: "serpapi".to_string(),
                })
            })
            .collect()
    }
}
