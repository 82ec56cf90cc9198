// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! RAG pipeline tests with stubbed search, fetch and model services
//!
//! These tests verify that:
//! - A question flows through search, aggregation and generation
//! - Each conversation keeps its own history
//! - Upstream failures map to distinct errors and leave memory consistent

use async_trait::async_trait;
use fabstir_rag_search::llm::{ChatCompletion, ChatMessage, ChatModel, GenerationError};
use fabstir_rag_search::rag::{
    AnswerGenerator, ContentAggregator, ConversationStore, ConversationTurn, MemoryConfig,
    RagError, RagPipeline, DEFAULT_SESSION_ID, NO_ARTICLES_SENTINEL,
};
use fabstir_rag_search::search::{
    ArticleSearch, DomainFilter, FetchError, PageFetcher, SearchError, SearchProvider,
    SearchResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns fixed links, or fails when `fail` is set
struct StubSearch {
    links: Vec<&'static str>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, _query: &str, num: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::ApiError {
                status: 503,
                message: "search unavailable".to_string(),
            });
        }
        Ok(self
            .links
            .iter()
            .take(num)
            .map(|link| SearchResult {
                title: String::new(),
                url: link.to_string(),
                snippet: String::new(),
                source: "stub".to_string(),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Serves `content of {url}` for every URL except those containing "broken"
struct StubFetcher;

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url.contains("broken") {
            return Err(FetchError::HttpStatus(500, url.to_string()));
        }
        Ok(format!("content of {}", url))
    }
}

/// Answers "A{n}" for the n-th call and records the prompts
#[derive(Default)]
struct StubModel {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, GenerationError> {
        if self.fail {
            return Err(GenerationError::Transport("connection refused".to_string()));
        }
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(messages[0].content.clone());
        Ok(ChatCompletion {
            content: format!("A{}", prompts.len()),
            model: "stub".to_string(),
            tokens_used: 10,
            processing_time_ms: 1,
        })
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

struct Harness {
    pipeline: RagPipeline,
    model: Arc<StubModel>,
    search_calls: Arc<AtomicUsize>,
}

fn harness(links: Vec<&'static str>, search_fails: bool, model_fails: bool, max_sessions: usize) -> Harness {
    let search_calls = Arc::new(AtomicUsize::new(0));
    let provider = StubSearch {
        links,
        fail: search_fails,
        calls: search_calls.clone(),
    };
    let model = Arc::new(StubModel {
        fail: model_fails,
        ..Default::default()
    });

    let pipeline = RagPipeline::new(
        ArticleSearch::with_provider(Box::new(provider), DomainFilter::default(), 3),
        ContentAggregator::new(Arc::new(StubFetcher)),
        AnswerGenerator::new(model.clone()),
        ConversationStore::new(MemoryConfig {
            max_sessions,
            ..Default::default()
        }),
    );

    Harness {
        pipeline,
        model,
        search_calls,
    }
}

/// Test 1: End-to-end answer with filtered sources
#[tokio::test]
async fn test_answer_flows_through_all_stages() {
    let h = harness(
        vec![
            "https://www.linkedin.com/in/someone",
            "https://example.com/one",
            "https://broken.example.com/two",
        ],
        false,
        false,
        10,
    );

    let answer = h.pipeline.answer("what is rust?", None).await.unwrap();

    assert_eq!(answer.answer, "A1");
    assert_eq!(answer.session_id, DEFAULT_SESSION_ID);
    assert_eq!(
        answer.sources,
        vec![
            "https://example.com/one".to_string(),
            "https://broken.example.com/two".to_string(),
        ]
    );
    assert_eq!(answer.articles_attempted, 2);
    assert_eq!(answer.articles_fetched, 1);

    let prompts = h.model.prompts.lock().unwrap();
    assert!(prompts[0].contains("### Article 1\n\ncontent of https://example.com/one"));
    assert!(!prompts[0].contains("### Article 2"));
    assert!(prompts[0].contains("what is rust?"));
}

/// Test 2: Follow-up questions see the previous exchange
#[tokio::test]
async fn test_follow_up_sees_history() {
    let h = harness(vec!["https://example.com/one"], false, false, 10);

    h.pipeline.answer("Q1", None).await.unwrap();
    h.pipeline.answer("Q2", None).await.unwrap();

    let memory = h.pipeline.conversations().get(DEFAULT_SESSION_ID).await.unwrap();
    assert_eq!(
        memory.snapshot(),
        vec![
            ConversationTurn::human("Q1"),
            ConversationTurn::assistant("A1"),
            ConversationTurn::human("Q2"),
            ConversationTurn::assistant("A2"),
        ]
    );

    let prompts = h.model.prompts.lock().unwrap();
    assert!(prompts[1].contains("Human: Q1\nAI: A1"));
}

/// Test 3: Sessions do not share history
#[tokio::test]
async fn test_sessions_are_isolated() {
    let h = harness(vec!["https://example.com/one"], false, false, 10);

    h.pipeline.answer("for alice", Some("alice")).await.unwrap();
    let bob = h.pipeline.answer("for bob", Some("bob")).await.unwrap();
    assert_eq!(bob.session_id, "bob");

    let prompts = h.model.prompts.lock().unwrap();
    assert!(!prompts[1].contains("for alice"));

    let alice = h.pipeline.conversations().get("alice").await.unwrap();
    assert_eq!(alice.len(), 2);
}

/// Test 4: No search results falls back to the sentinel text
#[tokio::test]
async fn test_no_results_uses_sentinel() {
    let h = harness(vec!["https://x.com/post"], false, false, 10);

    let answer = h.pipeline.answer("anything", None).await.unwrap();
    assert!(answer.sources.is_empty());
    assert_eq!(answer.articles_fetched, 0);

    let prompts = h.model.prompts.lock().unwrap();
    assert!(prompts[0].contains(NO_ARTICLES_SENTINEL));
}

/// Test 5: Search failure aborts before memory is touched
#[tokio::test]
async fn test_search_failure() {
    let h = harness(vec![], true, false, 10);

    let err = h.pipeline.answer("question", None).await.unwrap_err();
    assert!(matches!(err, RagError::Search(_)));
    assert_eq!(err.code(), "search_failed");

    let memory = h.pipeline.conversations().get(DEFAULT_SESSION_ID).await.unwrap();
    assert!(memory.is_empty());
    assert!(h.model.prompts.lock().unwrap().is_empty());
}

/// Test 6: Generation failure records the question but no answer
#[tokio::test]
async fn test_generation_failure() {
    let h = harness(vec!["https://example.com/one"], false, true, 10);

    let err = h.pipeline.answer("question", None).await.unwrap_err();
    assert_eq!(err.code(), "generation_failed");

    let memory = h.pipeline.conversations().get(DEFAULT_SESSION_ID).await.unwrap();
    assert_eq!(memory.snapshot(), vec![ConversationTurn::human("question")]);
}

/// Test 7: Empty query is rejected without calling search
#[tokio::test]
async fn test_empty_query_rejected() {
    let h = harness(vec!["https://example.com/one"], false, false, 10);

    let err = h.pipeline.answer("  ", None).await.unwrap_err();
    assert!(matches!(err, RagError::InvalidQuery(_)));
    assert_eq!(h.search_calls.load(Ordering::SeqCst), 0);
}

/// Test 8: A full store evicts the oldest conversation instead of failing
#[tokio::test]
async fn test_full_store_evicts_oldest() {
    let h = harness(vec!["https://example.com/one"], false, false, 1);

    h.pipeline.answer("first", Some("one")).await.unwrap();
    let answer = h.pipeline.answer("second", Some("two")).await.unwrap();

    assert_eq!(answer.session_id, "two");
    assert_eq!(h.search_calls.load(Ordering::SeqCst), 2);
    assert!(h.pipeline.conversations().get("one").await.is_none());
    assert_eq!(h.pipeline.conversations().get("two").await.unwrap().len(), 2);
}

/// Test 9: Blank session id uses the default conversation
#[tokio::test]
async fn test_blank_session_is_default() {
    let h = harness(vec!["https://example.com/one"], false, false, 10);

    let answer = h.pipeline.answer("question", Some("  ")).await.unwrap();
    assert_eq!(answer.session_id, DEFAULT_SESSION_ID);
}
