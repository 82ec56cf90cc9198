// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query API endpoint handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::request::QueryApiRequest;
use super::response::QueryApiResponse;
use crate::api::errors::ApiError;
use crate::api::server::AppState;

/// POST /query - Answer a question from fresh web articles
///
/// # Request
/// - `query`: Question text, or a list whose first entry is the question
/// - `sessionId`: Optional conversation id (default: shared conversation)
///
/// # Response
/// - `answer`: Generated answer
///
/// # Errors
/// - 400 Bad Request: Malformed body, or a missing, empty or oversized query
/// - 502 Bad Gateway: Search or language model failure
pub async fn query_handler(
    State(state): State<AppState>,
    body: Result<Json<QueryApiRequest>, JsonRejection>,
) -> Result<Json<QueryApiResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let Json(request) = body.map_err(|e| {
        warn!("[{}] Malformed query body: {}", request_id, e);
        ApiError::InvalidRequest(e.body_text())
    })?;
    debug!("[{}] Query request: {:?}", request_id, request.query);

    if let Err(e) = request.validate() {
        warn!("[{}] Query validation failed: {}", request_id, e);
        return Err(ApiError::InvalidRequest(e));
    }
    let question = request.question().unwrap_or_default();

    let answer = state
        .pipeline
        .answer(question, request.session_id.as_deref())
        .await
        .map_err(|e| {
            warn!("[{}] Query failed ({}): {}", request_id, e.code(), e);
            ApiError::from(e)
        })?;

    info!(
        "[{}] Query answered in {}ms ({} of {} articles, session {})",
        request_id,
        answer.elapsed_ms,
        answer.articles_fetched,
        answer.articles_attempted,
        answer.session_id
    );

    Ok(Json(QueryApiResponse::new(answer.answer)))
}
