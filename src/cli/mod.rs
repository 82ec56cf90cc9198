// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line client for the query API

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::api::{ErrorResponse, QueryApiRequest, QueryApiResponse, QueryInput};

/// Fabstir RAG search CLI
#[derive(Parser, Debug)]
#[command(name = "fabstir-rag-cli")]
#[command(version)]
#[command(about = "Ask questions answered from fresh web articles", long_about = None)]
pub struct Cli {
    /// Base URL of the query API
    #[arg(long, env = "RAG_API_URL", default_value = "http://127.0.0.1:5000")]
    pub api_url: String,

    /// Conversation to continue (default: the server's shared conversation)
    #[arg(long)]
    pub session: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Ask once and exit; without it, read questions from stdin
    pub query: Vec<String>,
}

/// What the server said about one question
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Answer(String),
    Error(String),
}

/// HTTP client for POST /query
pub struct QueryClient {
    http: reqwest::Client,
    query_url: String,
    session_id: Option<String>,
}

impl QueryClient {
    pub fn new(api_url: &str, session_id: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            query_url: format!("{}/query", api_url.trim_end_matches('/')),
            session_id,
        })
    }

    /// Send one question and interpret the reply
    ///
    /// Error bodies are returned verbatim; replies without one are reported
    /// by status code. Only transport failures are `Err`.
    pub async fn ask(&self, query: &str) -> Result<QueryOutcome> {
        let request = QueryApiRequest {
            query: QueryInput::Batch(vec![query.to_string()]),
            session_id: self.session_id.clone(),
        };

        debug!("POST {}", self.query_url);
        let response = self
            .http
            .post(&self.query_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.query_url))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            if let Ok(reply) = serde_json::from_str::<QueryApiResponse>(&body) {
                return Ok(QueryOutcome::Answer(reply.answer));
            }
        }
        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
            return Ok(QueryOutcome::Error(error.error));
        }
        Ok(QueryOutcome::Error(format!(
            "Something went wrong with the backend! Status code: {}",
            status.as_u16()
        )))
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let client = QueryClient::new(
        &cli.api_url,
        cli.session.clone(),
        Duration::from_secs(cli.timeout_secs),
    )?;

    if !cli.query.is_empty() {
        let query = cli.query.join(" ");
        if query.trim().is_empty() {
            return Err(anyhow!("Please enter a query before searching."));
        }
        return match client.ask(&query).await? {
            QueryOutcome::Answer(answer) => {
                println!("{}", answer);
                Ok(())
            }
            QueryOutcome::Error(message) => Err(anyhow!(message)),
        };
    }

    interactive(&client).await
}

async fn interactive(client: &QueryClient) -> Result<()> {
    println!("LLM-based RAG Search (type 'exit' to quit)");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"\nEnter your query: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            println!("⚠️  Please enter a query before searching.");
            continue;
        }

        match client.ask(query).await {
            Ok(QueryOutcome::Answer(answer)) => {
                println!("\nAgent Response\n");
                println!("Final Response: {}", answer);
            }
            Ok(QueryOutcome::Error(message)) => println!("❌ {}", message),
            Err(e) => println!("❌ Error: {:#}", e),
        }
    }

    Ok(())
}
