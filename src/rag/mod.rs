// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented answering
//!
//! Search results are fetched and joined into article text, which is then
//! handed to the language model together with the conversation so far.

pub mod aggregator;
pub mod errors;
pub mod generator;
pub mod memory;
pub mod pipeline;
pub mod prompt;

pub use aggregator::{AggregatedText, ContentAggregator, NO_ARTICLES_SENTINEL};
pub use errors::RagError;
pub use generator::AnswerGenerator;
pub use memory::{
    ConversationMemory, ConversationStore, ConversationTurn, MemoryConfig, TurnRole,
    DEFAULT_MEMORY_CAPACITY, DEFAULT_SESSION_ID,
};
pub use pipeline::{RagAnswer, RagPipeline};
