// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Collects each component's configuration, all loaded from environment
//! variables (a `.env` file is read by the binaries first).

use crate::api::ApiConfig;
use crate::llm::LlmConfig;
use crate::rag::MemoryConfig;
use crate::search::{ContentFetchConfig, SearchConfig};

/// Complete service configuration
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub search: SearchConfig,
    pub content: ContentFetchConfig,
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub api: ApiConfig,
}

impl NodeConfig {
    /// Load every component's configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            search: SearchConfig::from_env(),
            content: ContentFetchConfig::from_env(),
            llm: LlmConfig::from_env(),
            memory: MemoryConfig::from_env(),
            api: ApiConfig::from_env(),
        }
    }

    /// Validate all sections, naming the section that failed
    pub fn validate(&self) -> Result<(), String> {
        self.search.validate().map_err(|e| format!("search: {}", e))?;
        self.content.validate().map_err(|e| format!("content: {}", e))?;
        self.llm.validate().map_err(|e| format!("llm: {}", e))?;
        self.memory.validate().map_err(|e| format!("memory: {}", e))?;
        self.api.validate().map_err(|e| format!("api: {}", e))?;
        Ok(())
    }
}
