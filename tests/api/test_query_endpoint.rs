// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Query endpoint tests
//!
//! These tests verify that:
//! - POST /query accepts the list and string query forms
//! - Each error kind maps to its own status and code
//! - GET /health reports the service version and features
//! - The router serves answers built from real HTTP page fetches

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Html,
    routing::get,
    Router,
};
use fabstir_rag_search::{
    api::{create_app, AppState},
    llm::{ChatCompletion, ChatMessage, ChatModel, GenerationError},
    rag::{AnswerGenerator, ContentAggregator, ConversationStore, MemoryConfig, RagPipeline},
    search::{
        ArticleSearch, ContentFetchConfig, ContentFetcher, DomainFilter, FetchError, PageFetcher,
        SearchError, SearchProvider, SearchResult,
    },
    version,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

#[derive(Clone, Copy, PartialEq)]
enum Failure {
    None,
    Search,
    Model,
}

struct OneLinkSearch(Failure);

#[async_trait]
impl SearchProvider for OneLinkSearch {
    async fn search(&self, _query: &str, _num: usize) -> Result<Vec<SearchResult>, SearchError> {
        if self.0 == Failure::Search {
            return Err(SearchError::Timeout { timeout_ms: 10_000 });
        }
        Ok(vec![SearchResult {
            title: "Example".to_string(),
            url: "https://example.com/article".to_string(),
            snippet: String::new(),
            source: "stub".to_string(),
        }])
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Returns one fixed link
struct FixedLinkSearch(String);

#[async_trait]
impl SearchProvider for FixedLinkSearch {
    async fn search(&self, _query: &str, _num: usize) -> Result<Vec<SearchResult>, SearchError> {
        Ok(vec![SearchResult {
            title: "Local".to_string(),
            url: self.0.clone(),
            snippet: String::new(),
            source: "stub".to_string(),
        }])
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

struct EchoFetcher;

#[async_trait]
impl PageFetcher for EchoFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Ok(format!("text from {}", url))
    }
}

/// Answers with the number of history lines it was shown
struct CountingModel(Failure);

#[async_trait]
impl ChatModel for CountingModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, GenerationError> {
        if self.0 == Failure::Model {
            return Err(GenerationError::EmptyResponse);
        }
        let prompt = &messages[0].content;
        let history = prompt
            .lines()
            .filter(|l| l.starts_with("Human:") || l.starts_with("AI:"))
            .count();
        Ok(ChatCompletion {
            content: format!("answer with {} history lines", history),
            model: "counting".to_string(),
            tokens_used: 0,
            processing_time_ms: 0,
        })
    }

    fn model_name(&self) -> &str {
        "counting"
    }
}

/// Answers with the first article paragraph it was given
struct ArticleModel;

#[async_trait]
impl ChatModel for ArticleModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, GenerationError> {
        let served = messages[0]
            .content
            .lines()
            .find(|l| l.starts_with("Served"))
            .unwrap_or("no article")
            .to_string();
        Ok(ChatCompletion {
            content: served,
            model: "article".to_string(),
            tokens_used: 0,
            processing_time_ms: 0,
        })
    }

    fn model_name(&self) -> &str {
        "article"
    }
}

fn app(failure: Failure) -> Router {
    let pipeline = RagPipeline::new(
        ArticleSearch::with_provider(Box::new(OneLinkSearch(failure)), DomainFilter::default(), 3),
        ContentAggregator::new(Arc::new(EchoFetcher)),
        AnswerGenerator::new(Arc::new(CountingModel(failure))),
        ConversationStore::new(MemoryConfig::default()),
    );
    create_app(AppState::new(pipeline))
}

fn post_query(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[cfg(test)]
mod query_endpoint_tests {
    use super::*;

    /// Test 1: List form returns an answer
    #[tokio::test]
    async fn test_query_list_form() {
        let (status, body) = send(app(Failure::None), post_query(json!({"query": ["what?"]}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answer": "answer with 0 history lines"}));
    }

    /// Test 2: String form and conversation continuity across requests
    #[tokio::test]
    async fn test_query_string_form_keeps_history() {
        let app = app(Failure::None);

        let (status, _) = send(
            app.clone(),
            post_query(json!({"query": "first", "sessionId": "s1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            app.clone(),
            post_query(json!({"query": "second", "sessionId": "s1"})),
        )
        .await;
        assert_eq!(body["answer"], "answer with 2 history lines");

        // A different session starts fresh
        let (_, body) = send(app, post_query(json!({"query": "other", "sessionId": "s2"}))).await;
        assert_eq!(body["answer"], "answer with 0 history lines");
    }

    /// Test 3: Empty query is a 400 invalid_request
    #[tokio::test]
    async fn test_empty_query_rejected() {
        let (status, body) = send(app(Failure::None), post_query(json!({"query": [""]}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["error"], "Query cannot be empty");
    }

    /// Test 4: Malformed body is a 400 invalid_request
    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let (status, body) = send(app(Failure::None), post_query(json!({"question": "x"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }

    /// Test 5: Search failure is a 502 search_failed
    #[tokio::test]
    async fn test_search_failure_status() {
        let (status, body) = send(app(Failure::Search), post_query(json!({"query": ["q"]}))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "search_failed");
        assert!(body["error"].as_str().unwrap().contains("timeout"));
    }

    /// Test 6: Generation failure is a 502 generation_failed
    #[tokio::test]
    async fn test_generation_failure_status() {
        let (status, body) = send(app(Failure::Model), post_query(json!({"query": ["q"]}))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "generation_failed");
    }

    /// Test 7: Health reports version and features
    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(Failure::None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], version::VERSION_NUMBER);
        assert_eq!(body["features"], json!(version::FEATURES));
    }

    /// Test 8: GET /query is not allowed
    #[tokio::test]
    async fn test_query_requires_post() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/query")
            .body(Body::empty())
            .unwrap();
        let response = app(Failure::None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    /// Test 9: Answers flow through a real ContentFetcher behind the router
    #[tokio::test]
    async fn test_query_with_http_fetcher() {
        let pages = Router::new().route(
            "/article",
            get(|| async { Html("<html><body><h1>Local</h1><p>Served text.</p></body></html>") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, pages).await.unwrap();
        });

        let fetcher = ContentFetcher::new(ContentFetchConfig {
            allow_private_hosts: true,
            ..Default::default()
        })
        .unwrap();
        let pipeline = RagPipeline::new(
            ArticleSearch::with_provider(
                Box::new(FixedLinkSearch(format!("http://{}/article", addr))),
                DomainFilter::default(),
                3,
            ),
            ContentAggregator::with_concurrency(Arc::new(fetcher), 2),
            AnswerGenerator::new(Arc::new(ArticleModel)),
            ConversationStore::new(MemoryConfig::default()),
        );
        let app = create_app(AppState::new(pipeline));

        let (status, body) = send(app, post_query(json!({"query": "what is served?"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answer": "Served text."}));
    }
}
