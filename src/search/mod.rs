// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search and article retrieval
//!
//! Finds candidate articles for a query and turns their pages into plain
//! text for the answer generator:
//! - Search providers (SerpAPI, Brave, DuckDuckGo), one selected per node
//! - Social-media domain denylist applied to every result list
//! - Page fetching and heading/paragraph extraction

pub mod brave;
pub mod config;
pub mod content;
pub mod duckduckgo;
pub mod filter;
pub mod provider;
pub mod serpapi;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use filter::DomainFilter;
pub use provider::SearchProvider;
pub use service::ArticleSearch;
pub use types::{ArticleSearchResponse, SearchError, SearchResult};

pub use content::{ContentFetchConfig, ContentFetcher, FetchError, PageFetcher};
