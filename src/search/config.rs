// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for article search

use std::env;

use super::filter::DEFAULT_EXCLUDED_DOMAINS;

/// Configuration for article search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Provider used for every search ("serpapi", "brave" or "duckduckgo")
    pub provider: String,
    /// Provider-specific configuration
    pub providers: SearchProviderConfig,
    /// Result-count hint sent to the provider
    pub num_results: usize,
    /// Domains whose links are dropped from results
    pub excluded_domains: Vec<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default)]
pub struct SearchProviderConfig {
    /// SerpAPI key
    pub serpapi_api_key: Option<String>,
    /// Brave Search API key
    pub brave_api_key: Option<String>,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env::var("SEARCH_PROVIDER")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.provider),
            providers: SearchProviderConfig {
                serpapi_api_key: env::var("SERPAPI_KEY").ok(),
                brave_api_key: env::var("BRAVE_API_KEY").ok(),
            },
            num_results: env::var("SEARCH_NUM_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.num_results),
            excluded_domains: env::var("SEARCH_EXCLUDED_DOMAINS")
                .map(|v| {
                    v.split(',')
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.excluded_domains),
            request_timeout_secs: env::var("SEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.num_results == 0 {
            return Err("num_results must be at least 1".to_string());
        }
        if self.num_results > 20 {
            return Err("num_results cannot exceed 20".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }
        match self.provider.as_str() {
            "serpapi" if !has_key(&self.providers.serpapi_api_key) => {
                Err("SERPAPI_KEY is required for the serpapi provider".to_string())
            }
            "brave" if !has_key(&self.providers.brave_api_key) => {
                Err("BRAVE_API_KEY is required for the brave provider".to_string())
            }
            "serpapi" | "brave" | "duckduckgo" => Ok(()),
            other => Err(format!("Unknown search provider: {}", other)),
        }
    }
}

fn has_key(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "serpapi".to_string(),
            providers: SearchProviderConfig::default(),
            num_results: 3,
            excluded_domains: DEFAULT_EXCLUDED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            request_timeout_secs: 10,
        }
    }
}
