// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the question-answering pipeline
//!
//! Article fetch failures never reach this level: the aggregator drops the
//! article and carries on. What remains are the failures that abort a
//! request:
//! - search errors (provider unavailable, non-success status, bad query)
//! - generation errors (model unavailable, malformed or empty response)

use thiserror::Error;

use crate::llm::GenerationError;
use crate::search::SearchError;

/// Errors that abort a question/answer request
#[derive(Error, Debug)]
pub enum RagError {
    /// The query was rejected before any upstream call
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Article search failed
    #[error("Unable to retrieve search results: {0}")]
    Search(SearchError),

    /// Answer generation failed
    #[error("Unable to generate answer: {0}")]
    Generation(#[from] GenerationError),
}

impl From<SearchError> for RagError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidQuery { reason } => RagError::InvalidQuery(reason),
            other => RagError::Search(other),
        }
    }
}

impl RagError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            RagError::InvalidQuery(_) => "invalid_request",
            RagError::Search(_) => "search_failed",
            RagError::Generation(_) => "generation_failed",
        }
    }
}
