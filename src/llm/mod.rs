// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted language model access
//!
//! Talks to any OpenAI-compatible chat-completions API. The default target
//! is Groq running `llama-3.3-70b-versatile`.

pub mod client;
pub mod config;
pub mod model;
pub mod types;

pub use client::ChatClient;
pub use config::LlmConfig;
pub use model::ChatModel;
pub use types::{ChatCompletion, ChatMessage, ChatRole, GenerationError};
