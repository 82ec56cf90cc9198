// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod llm;
pub mod rag;
pub mod search;
pub mod version;

// Re-export main types
pub use api::{create_app, AppState};
pub use config::NodeConfig;
pub use rag::{RagAnswer, RagError, RagPipeline};
