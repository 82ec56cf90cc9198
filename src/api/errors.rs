// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rag::RagError;

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    SearchFailed(String),
    GenerationFailed(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::SearchFailed(_) => "search_failed",
            ApiError::GenerationFailed(_) => "generation_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SearchFailed(_) | ApiError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message().to_string(),
            code: self.code().to_string(),
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::InvalidRequest(msg)
            | ApiError::SearchFailed(msg)
            | ApiError::GenerationFailed(msg) => msg,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        let message = err.to_string();
        match err {
            RagError::InvalidQuery(_) => ApiError::InvalidRequest(message),
            RagError::Search(_) => ApiError::SearchFailed(message),
            RagError::Generation(_) => ApiError::GenerationFailed(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
