// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use fabstir_rag_search::{
    api::{start_server, AppState},
    config::NodeConfig,
    rag::RagPipeline,
    version,
};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How often idle conversations are swept
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading any configuration
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...\n", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("🧩 Features: {}", version::FEATURES.join(", "));
    println!();

    let config = NodeConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!(
        "Search provider: {}, results per query: {}, excluded domains: {}",
        config.search.provider,
        config.search.num_results,
        config.search.excluded_domains.join(", ")
    );
    info!(
        "Language model: {} at {}",
        config.llm.model, config.llm.api_base
    );
    info!(
        "Conversation memory: {} turns, up to {} sessions, {}s idle expiry",
        config.memory.capacity, config.memory.max_sessions, config.memory.session_ttl_secs
    );

    let state = AppState::new(RagPipeline::from_config(&config)?);
    spawn_session_cleanup(state.pipeline.clone());

    println!("✅ Ready. Listening on {}:{}", config.api.host, config.api.port);
    start_server(&config.api, state).await
}

fn spawn_session_cleanup(pipeline: Arc<RagPipeline>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = pipeline.conversations().cleanup_expired().await;
            if removed > 0 {
                info!("Expired {} idle conversations", removed);
            }
        }
    });
}
