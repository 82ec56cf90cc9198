// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Question-answering pipeline: search, aggregate, generate

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::aggregator::ContentAggregator;
use super::errors::RagError;
use super::generator::AnswerGenerator;
use super::memory::{ConversationStore, DEFAULT_SESSION_ID};
use crate::config::NodeConfig;
use crate::llm::ChatClient;
use crate::search::{ArticleSearch, ContentFetcher};

/// Result of one answered question
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagAnswer {
    pub answer: String,
    pub session_id: String,
    /// Article URLs passed to the aggregator, in search order
    pub sources: Vec<String>,
    pub articles_attempted: usize,
    pub articles_fetched: usize,
    pub elapsed_ms: u64,
}

/// Runs each question through search, aggregation and generation
pub struct RagPipeline {
    search: ArticleSearch,
    aggregator: ContentAggregator,
    generator: AnswerGenerator,
    conversations: ConversationStore,
}

impl RagPipeline {
    pub fn new(
        search: ArticleSearch,
        aggregator: ContentAggregator,
        generator: AnswerGenerator,
        conversations: ConversationStore,
    ) -> Self {
        Self {
            search,
            aggregator,
            generator,
            conversations,
        }
    }

    /// Build the pipeline with real search, fetch and model clients
    pub fn from_config(config: &NodeConfig) -> anyhow::Result<Self> {
        let search = ArticleSearch::new(&config.search).context("Failed to create search service")?;
        let fetcher = ContentFetcher::new(config.content.clone())
            .context("Failed to create content fetcher")?;
        let model = ChatClient::new(&config.llm).context("Failed to create chat model client")?;

        info!(
            "RAG pipeline ready: search={}, model={}, fetch_concurrency={}",
            search.provider_name(),
            config.llm.model,
            config.content.fetch_concurrency
        );

        Ok(Self::new(
            search,
            ContentAggregator::with_concurrency(
                Arc::new(fetcher),
                config.content.fetch_concurrency,
            ),
            AnswerGenerator::new(Arc::new(model)),
            ConversationStore::new(config.memory.clone()),
        ))
    }

    /// Answer `query` within the given conversation (or the default one)
    pub async fn answer(&self, query: &str, session_id: Option<&str>) -> Result<RagAnswer, RagError> {
        let start = Instant::now();
        let session_id = session_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID);

        let memory = self.conversations.get_or_create(session_id).await;

        info!("Searching articles for session {}", session_id);
        let search = self.search.search(query).await?;

        info!("Fetching {} articles", search.urls.len());
        let aggregated = self.aggregator.aggregate(&search.urls).await;
        if aggregated.all_fetches_failed() {
            warn!("No article content available, answering from model knowledge");
        }

        info!("Generating answer");
        let answer = self
            .generator
            .generate(&memory, &aggregated.text, query)
            .await?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            "Answered in {}ms using {} of {} articles",
            elapsed_ms, aggregated.fetched, aggregated.attempted
        );

        Ok(RagAnswer {
            answer,
            session_id: session_id.to_string(),
            sources: search.urls,
            articles_attempted: aggregated.attempted,
            articles_fetched: aggregated.fetched,
            elapsed_ms,
        })
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }
}
