// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation memory
//!
//! A conversation keeps only its most recent turns (five by default). Each
//! conversation is an owned [`ConversationMemory`]; the
//! [`ConversationStore`] hands them out by session id.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Turns kept per conversation by default
pub const DEFAULT_MEMORY_CAPACITY: usize = 5;

/// Session used when a caller does not name one
pub const DEFAULT_SESSION_ID: &str = "default";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Fixed-capacity FIFO of conversation turns
#[derive(Debug)]
pub struct ConversationMemory {
    capacity: usize,
    turns: Mutex<VecDeque<ConversationTurn>>,
    exchange: tokio::sync::Mutex<()>,
}

/// Held for the duration of one question/answer exchange
pub type ExchangeGuard<'a> = tokio::sync::MutexGuard<'a, ()>;

impl ConversationMemory {
    /// Create an empty memory holding at most `capacity` turns (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            turns: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            exchange: tokio::sync::Mutex::new(()),
        }
    }

    /// Add a turn, evicting the oldest turns beyond capacity
    pub fn append(&self, role: TurnRole, content: impl Into<String>) {
        let mut turns = self.lock_turns();
        turns.push_back(ConversationTurn {
            role,
            content: content.into(),
        });
        while turns.len() > self.capacity {
            turns.pop_front();
        }
    }

    /// Current turns, oldest first
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.lock_turns().iter().cloned().collect()
    }

    /// Serialize whole exchanges on this conversation
    ///
    /// Callers that read history, ask the model and record the answer hold
    /// this guard throughout, so two exchanges never interleave their turns.
    pub async fn begin_exchange(&self) -> ExchangeGuard<'_> {
        self.exchange.lock().await
    }

    pub fn len(&self) -> usize {
        self.lock_turns().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_turns().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock_turns().clear();
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still usable.
    fn lock_turns(&self) -> MutexGuard<'_, VecDeque<ConversationTurn>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

/// Configuration for conversation memory
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Turns kept per conversation (default: 5)
    pub capacity: usize,
    /// Maximum live conversations (default: 1000)
    pub max_sessions: usize,
    /// Idle seconds before a conversation expires (default: 3600)
    pub session_ttl_secs: u64,
}

impl MemoryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("MEMORY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            max_sessions: env::var("MEMORY_MAX_SESSIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_sessions),
            session_ttl_secs: env::var("MEMORY_SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.session_ttl_secs),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("memory capacity must be at least 1".to_string());
        }
        if self.max_sessions == 0 {
            return Err("max_sessions must be at least 1".to_string());
        }
        if self.session_ttl_secs == 0 {
            return Err("session_ttl_secs must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_MEMORY_CAPACITY,
            max_sessions: 1000,
            session_ttl_secs: 3600,
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    memory: Arc<ConversationMemory>,
    last_used: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_used) >= ttl
    }
}

/// Conversations keyed by session id
///
/// Holds at most `max_sessions` conversations. Making room for a new one
/// first drops the expired conversations, then the least recently used.
#[derive(Debug)]
pub struct ConversationStore {
    config: MemoryConfig,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl ConversationStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get the conversation for `session_id`, creating it if needed
    pub async fn get_or_create(&self, session_id: &str) -> Arc<ConversationMemory> {
        self.get_or_create_at(session_id, Instant::now()).await
    }

    async fn get_or_create_at(&self, session_id: &str, now: Instant) -> Arc<ConversationMemory> {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.last_used = now;
            return entry.memory.clone();
        }

        if sessions.len() >= self.config.max_sessions {
            let ttl = self.config.session_ttl();
            let before = sessions.len();
            sessions.retain(|_, entry| !entry.is_expired(now, ttl));
            if before > sessions.len() {
                debug!("Dropped {} expired conversations", before - sessions.len());
            }
        }
        while sessions.len() >= self.config.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    debug!("Evicting least recently used conversation {}", id);
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        debug!("Creating conversation memory for session {}", session_id);
        let memory = Arc::new(ConversationMemory::new(self.config.capacity));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                memory: memory.clone(),
                last_used: now,
            },
        );
        memory
    }

    /// Get an existing conversation
    pub async fn get(&self, session_id: &str) -> Option<Arc<ConversationMemory>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|entry| entry.memory.clone())
    }

    /// Drop a conversation; returns whether it existed
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Drop conversations idle for longer than the configured TTL
    ///
    /// Returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Instant::now()).await
    }

    async fn cleanup_expired_at(&self, now: Instant) -> usize {
        let ttl = self.config.session_ttl();
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();

        sessions.retain(|_, entry| !entry.is_expired(now, ttl));

        initial_count - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}
