// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Answer generation over a conversation

use std::sync::Arc;
use tracing::{debug, info};

use super::memory::{ConversationMemory, TurnRole};
use super::prompt::build_answer_prompt;
use crate::llm::{ChatMessage, ChatModel, GenerationError};

/// Produces answers from aggregated articles and conversation history
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Answer `question` and record the exchange in `memory`
    ///
    /// History is read before the question is recorded, so the prompt never
    /// repeats the current question. The answer is recorded only when the
    /// model returns one.
    pub async fn generate(
        &self,
        memory: &ConversationMemory,
        aggregated_text: &str,
        question: &str,
    ) -> Result<String, GenerationError> {
        let _exchange = memory.begin_exchange().await;

        let history = memory.snapshot();
        memory.append(TurnRole::Human, question);

        let prompt = build_answer_prompt(&history, aggregated_text, question);
        debug!(
            "Answer prompt built: {} history turns, {} chars",
            history.len(),
            prompt.len()
        );

        let completion = self.model.complete(&[ChatMessage::user(prompt)]).await?;

        info!(
            "Answer generated by {} in {}ms ({} tokens)",
            completion.model, completion.processing_time_ms, completion.tokens_used
        );

        memory.append(TurnRole::Assistant, completion.content.clone());
        Ok(completion.content)
    }
}
