// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat model trait definition

use async_trait::async_trait;

use super::types::{ChatCompletion, ChatMessage, GenerationError};

/// A hosted language model that completes a chat
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate the next assistant message for `messages`
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, GenerationError>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}
