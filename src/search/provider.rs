// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The seam between [`ArticleSearch`](super::service::ArticleSearch) and a
//! concrete search backend

use async_trait::async_trait;

use super::types::{SearchError, SearchResult};

/// A web search backend (SerpAPI, Brave or DuckDuckGo)
///
/// One call is one upstream request. Denylist filtering and the result
/// cap happen in `ArticleSearch`, never here.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Results in the backend's own ranking; `num_results` is only a hint
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Short lowercase id, as used in `SEARCH_PROVIDER`
    fn name(&self) -> &'static str;

    /// False when a required API key is missing
    fn is_available(&self) -> bool;
}
