// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Article search orchestration
//!
//! Runs one query against the configured provider and filters the results
//! down to candidate article URLs.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::brave::BraveSearchProvider;
use super::config::SearchConfig;
use super::duckduckgo::DuckDuckGoProvider;
use super::filter::DomainFilter;
use super::provider::SearchProvider;
use super::serpapi::SerpApiProvider;
use super::types::{ArticleSearchResponse, SearchError};

/// Maximum accepted query length in characters
pub const MAX_QUERY_CHARS: usize = 500;

/// Finds candidate article URLs for a query
pub struct ArticleSearch {
    provider: Box<dyn SearchProvider>,
    filter: DomainFilter,
    num_results: usize,
}

impl ArticleSearch {
    /// Create the search service from configuration
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let provider: Box<dyn SearchProvider> = match config.provider.as_str() {
            "serpapi" => {
                let key = config.providers.serpapi_api_key.clone().unwrap_or_default();
                Box::new(SerpApiProvider::new(key, timeout)?)
            }
            "brave" => {
                let key = config.providers.brave_api_key.clone().unwrap_or_default();
                Box::new(BraveSearchProvider::new(key, timeout)?)
            }
            "duckduckgo" => Box::new(DuckDuckGoProvider::new(timeout)?),
            other => return Err(SearchError::UnknownProvider(other.to_string())),
        };

        debug!("Search provider enabled: {}", provider.name());

        Ok(Self::with_provider(
            provider,
            DomainFilter::new(&config.excluded_domains),
            config.num_results,
        ))
    }

    /// Create the search service around an existing provider
    pub fn with_provider(
        provider: Box<dyn SearchProvider>,
        filter: DomainFilter,
        num_results: usize,
    ) -> Self {
        Self {
            provider,
            filter,
            num_results,
        }
    }

    /// Search for articles related to `query`
    ///
    /// Performs a single upstream request. There is no retry and no fallback
    /// provider; any upstream failure is returned to the caller.
    pub async fn search(&self, query: &str) -> Result<ArticleSearchResponse, SearchError> {
        validate_query(query)?;

        if !self.provider.is_available() {
            return Err(SearchError::NoApiKey {
                provider: self.provider.name().to_string(),
            });
        }

        let start = Instant::now();
        let results = self.provider.search(query, self.num_results).await?;
        let raw_result_count = results.len();

        let urls = self
            .filter
            .retain_allowed(results.into_iter().map(|r| r.url));
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            "Search complete: {} of {} results kept from {} in {}ms",
            urls.len(),
            raw_result_count,
            self.provider.name(),
            elapsed_ms
        );

        Ok(ArticleSearchResponse {
            query: query.to_string(),
            excluded_count: raw_result_count - urls.len(),
            urls,
            raw_result_count,
            provider: self.provider.name().to_string(),
            search_time_ms: elapsed_ms,
        })
    }

    /// Name of the configured provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Result-count hint sent upstream
    pub fn num_results(&self) -> usize {
        self.num_results
    }
}

fn validate_query(query: &str) -> Result<(), SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery {
            reason: "Query cannot be empty".to_string(),
        });
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(SearchError::InvalidQuery {
            reason: format!("Query too long (max {} characters)", MAX_QUERY_CHARS),
        });
    }
    Ok(())
}
