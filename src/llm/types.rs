// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-compatible chat completion types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatUsage {
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseMessage {
    pub content: Option<String>,
}

/// Text produced by a chat model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    pub tokens_used: u32,
    pub processing_time_ms: u64,
}

/// Errors from the language-model service
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// No API key configured for the model service
    #[error("No API key configured for the language model service")]
    NoApiKey,

    /// Request could not be sent or the connection failed
    #[error("Language model request failed: {0}")]
    Transport(String),

    /// Request timed out
    #[error("Language model request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Non-success response from the model service
    #[error("Language model API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Invalid language model response: {0}")]
    InvalidResponse(String),

    /// Response decoded but carried no usable text
    #[error("Language model returned no content")]
    EmptyResponse,
}
