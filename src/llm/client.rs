// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat model client for OpenAI-compatible APIs (Groq by default)

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::config::LlmConfig;
use super::model::ChatModel;
use super::types::{ChatCompletion, ChatMessage, ChatRequest, ChatResponse, GenerationError};

/// Client for a chat-completions endpoint
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    timeout_ms: u64,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(config: &LlmConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::NoApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let endpoint = config.api_base.trim_end_matches('/').to_string();
        info!(
            "Chat model client configured: endpoint={}, model={}",
            endpoint, config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
            model_name: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_ms: config.timeout_secs * 1000,
        })
    }

    /// Full URL of the completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, GenerationError> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &self.model_name,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending {} messages to {}",
            messages.len(),
            self.completions_url()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    GenerationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(ChatCompletion {
            content,
            model: chat_response
                .model
                .unwrap_or_else(|| self.model_name.clone()),
            tokens_used: chat_response.usage.map(|u| u.total_tokens).unwrap_or(0),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
