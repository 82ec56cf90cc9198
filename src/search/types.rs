// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for article search

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single result returned by a web search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Title of the search result
    pub title: String,
    /// URL of the search result
    pub url: String,
    /// Snippet/description of the search result
    pub snippet: String,
    /// Source provider (e.g., "serpapi", "brave", "duckduckgo")
    pub source: String,
}

/// Candidate articles for one query, after domain filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSearchResponse {
    /// The original search query
    pub query: String,
    /// Article URLs in upstream ranking order
    pub urls: Vec<String>,
    /// Number of raw results before filtering
    pub raw_result_count: usize,
    /// Number of results dropped by the domain denylist
    pub excluded_count: usize,
    /// Provider that returned the results
    pub provider: String,
    /// Time taken for the search in milliseconds
    pub search_time_ms: u64,
}

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-success response from the search provider
    #[error("Search API error: {status} - {message}")]
    ApiError {
        /// HTTP status code (0 when no response was received)
        status: u16,
        /// Error message
        message: String,
    },

    /// Search request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Response body could not be decoded
    #[error("Invalid search response from {provider}: {message}")]
    InvalidResponse {
        /// Provider that produced the response
        provider: String,
        /// Decoder error
        message: String,
    },

    /// No API key configured for the provider
    #[error("No API key configured for {provider}")]
    NoApiKey {
        /// Name of the provider missing API key
        provider: String,
    },

    /// Configured provider name is not known
    #[error("Unknown search provider: {0}")]
    UnknownProvider(String),

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Reason the query is invalid
        reason: String,
    },
}

impl SearchError {
    /// Map a reqwest transport error into a search error
    pub(crate) fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            SearchError::Timeout { timeout_ms }
        } else {
            SearchError::ApiError {
                status: 0,
                message: err.to_string(),
            }
        }
    }
}
