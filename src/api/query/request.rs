// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query API request types

use serde::{Deserialize, Serialize};

use crate::search::service::MAX_QUERY_CHARS;

/// Longest accepted `sessionId`, in characters
pub const MAX_SESSION_ID_CHARS: usize = 128;

/// Query text, accepted either bare or as a one-element list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QueryInput {
    Single(String),
    Batch(Vec<String>),
}

/// Request body for POST /query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryApiRequest {
    /// Question to answer; only the first entry of a list is used
    pub query: QueryInput,

    /// Conversation to continue (default: the shared conversation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl QueryApiRequest {
    /// The question text, if any
    pub fn question(&self) -> Option<&str> {
        match &self.query {
            QueryInput::Single(q) => Some(q.as_str()),
            QueryInput::Batch(list) => list.first().map(String::as_str),
        }
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        let question = self
            .question()
            .ok_or_else(|| "Query list cannot be empty".to_string())?;
        if question.trim().is_empty() {
            return Err("Query cannot be empty".to_string());
        }
        if question.chars().count() > MAX_QUERY_CHARS {
            return Err(format!(
                "Query too long (max {} characters)",
                MAX_QUERY_CHARS
            ));
        }
        if let Some(session_id) = &self.session_id {
            if session_id.chars().count() > MAX_SESSION_ID_CHARS {
                return Err(format!(
                    "sessionId too long (max {} characters)",
                    MAX_SESSION_ID_CHARS
                ));
            }
        }
        Ok(())
    }
}
