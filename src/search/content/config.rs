//! Configuration for content fetching
//!
//! Defines settings for HTTP fetching and how many pages are fetched at once.

use std::env;

/// Configuration for content fetching
#[derive(Debug, Clone)]
pub struct ContentFetchConfig {
    /// Timeout per page fetch in seconds (default: 10)
    pub timeout_per_page_secs: u64,
    /// Maximum redirects followed per page (default: 5)
    pub max_redirects: usize,
    /// Pages fetched concurrently (default: 1, strictly sequential)
    pub fetch_concurrency: usize,
    /// Allow fetching loopback and private-network hosts (default: false)
    pub allow_private_hosts: bool,
}

impl ContentFetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_per_page_secs: env::var("CONTENT_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_per_page_secs),
            max_redirects: defaults.max_redirects,
            fetch_concurrency: env::var("CONTENT_FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_concurrency)
                .clamp(1, 8),
            allow_private_hosts: env::var("CONTENT_FETCH_ALLOW_PRIVATE_HOSTS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.allow_private_hosts),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_per_page_secs == 0 {
            return Err("timeout_per_page_secs must be at least 1".to_string());
        }
        if self.fetch_concurrency == 0 {
            return Err("fetch_concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ContentFetchConfig {
    fn default() -> Self {
        Self {
            timeout_per_page_secs: 10,
            max_redirects: 5,
            fetch_concurrency: 1,
            allow_private_hosts: false,
        }
    }
}
