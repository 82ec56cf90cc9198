// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Article search tests against a local stand-in for the search API
//!
//! These tests verify that:
//! - The query, key, engine and result-count hint reach the search API
//! - Denylisted domains are dropped and order is preserved
//! - Upstream failures surface as search errors
//! - DuckDuckGo result pages are parsed

use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use fabstir_rag_search::search::{
    duckduckgo::DuckDuckGoProvider, serpapi::SerpApiProvider, ArticleSearch, DomainFilter,
    SearchError,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn serpapi_search(params: Query<HashMap<String, String>>) -> impl IntoResponse {
    let expected = [
        ("q", "rust async"),
        ("api_key", "test-key"),
        ("engine", "google"),
        ("num", "3"),
    ];
    for (key, value) in expected {
        if params.get(key).map(String::as_str) != Some(value) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("bad {}", key) })),
            );
        }
    }

    (
        StatusCode::OK,
        Json(json!({
            "organic_results": [
                { "title": "A", "link": "https://www.linkedin.com/pulse/rust" },
                { "title": "B", "link": "https://example.com/rust" },
                { "title": "C", "link": "https://blog.example.org/async" },
                { "title": "D", "link": "https://m.facebook.com/post" }
            ]
        })),
    )
}

fn article_search(endpoint: &str, key: &str) -> ArticleSearch {
    let provider =
        SerpApiProvider::with_endpoint(key.to_string(), endpoint, Duration::from_secs(5))
            .unwrap();
    ArticleSearch::with_provider(Box::new(provider), DomainFilter::default(), 3)
}

/// Test 1: Request parameters and domain filtering
#[tokio::test]
async fn test_search_filters_denylisted_domains() {
    let base = serve(Router::new().route("/search", get(serpapi_search))).await;
    let search = article_search(&format!("{}/search", base), "test-key");

    let response = search.search("rust async").await.unwrap();

    assert_eq!(
        response.urls,
        vec![
            "https://example.com/rust".to_string(),
            "https://blog.example.org/async".to_string(),
        ]
    );
    assert_eq!(response.raw_result_count, 4);
    assert_eq!(response.excluded_count, 2);
    assert_eq!(response.provider, "serpapi");
}

/// Test 2: Upstream error status is returned, not swallowed
#[tokio::test]
async fn test_upstream_failure_is_error() {
    let router = Router::new().route(
        "/search",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "quota exceeded") }),
    );
    let base = serve(router).await;
    let search = article_search(&format!("{}/search", base), "test-key");

    let result = search.search("rust").await;
    match result {
        Err(SearchError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

/// Test 3: Rejected key maps to NoApiKey
#[tokio::test]
async fn test_unauthorized_maps_to_no_api_key() {
    let router = Router::new().route("/search", get(|| async { StatusCode::UNAUTHORIZED }));
    let base = serve(router).await;
    let search = article_search(&format!("{}/search", base), "wrong-key");

    let result = search.search("rust").await;
    assert!(matches!(result, Err(SearchError::NoApiKey { .. })));
}

/// Test 4: Empty key never reaches the network
#[tokio::test]
async fn test_missing_key_fails_without_request() {
    // Nothing listens on this port
    let search = article_search("http://127.0.0.1:9/search", "");
    let result = search.search("rust").await;
    assert!(matches!(result, Err(SearchError::NoApiKey { .. })));
}

/// Test 5: Blank query rejected before the provider is called
#[tokio::test]
async fn test_blank_query_rejected() {
    let search = article_search("http://127.0.0.1:9/search", "test-key");
    let result = search.search("   ").await;
    assert!(matches!(result, Err(SearchError::InvalidQuery { .. })));
}

/// Test 6: Malformed JSON is an invalid response
#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let router = Router::new().route("/search", get(|| async { "not json" }));
    let base = serve(router).await;
    let search = article_search(&format!("{}/search", base), "test-key");

    let result = search.search("rust").await;
    assert!(matches!(result, Err(SearchError::InvalidResponse { .. })));
}

/// Test 7: DuckDuckGo HTML results are parsed and redirects resolved
#[tokio::test]
async fn test_duckduckgo_html_results() {
    let page = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fguide&rut=abc">Guide</a>
            <a class="result__snippet">A guide</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://www.tiktok.com/@rust">Clip</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://docs.example.net/intro">Intro</a>
          </div>
        </body></html>
    "#;
    let router = Router::new().route("/html/", post(move || async move { Html(page) }));
    let base = serve(router).await;

    let provider =
        DuckDuckGoProvider::with_endpoint(&format!("{}/html/", base), Duration::from_secs(5))
            .unwrap();
    let search = ArticleSearch::with_provider(Box::new(provider), DomainFilter::default(), 3);

    let response = search.search("rust guide").await.unwrap();
    assert_eq!(
        response.urls,
        vec![
            "https://example.com/guide".to_string(),
            "https://docs.example.net/intro".to_string(),
        ]
    );
    assert_eq!(response.excluded_count, 1);
}
