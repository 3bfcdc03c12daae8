// ABOUTME: Ephemeral protocol session registry with TTL eviction
// ABOUTME: Concurrent map keyed by opaque UUID session identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Session Registry.
//!
//! Sessions are created on `initialize`, consulted on every subsequent
//! call, and evicted after sitting idle past the configured TTL by a
//! background sweep task. They are process-local and best-effort; losing
//! one is not an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// State held per protocol session
#[derive(Debug, Clone)]
pub struct ProtocolSession {
    /// Opaque session identifier
    pub id: String,
    /// Client metadata negotiated at `initialize`
    pub client_info: Value,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last time any call referenced this session
    last_seen: Instant,
}

/// Concurrent session registry with idle-TTL eviction
pub struct SessionRegistry {
    sessions: DashMap<String, ProtocolSession>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Create a registry evicting sessions idle longer than `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Mint a new session with a collision-resistant random identifier
    pub fn create(&self, client_info: Value) -> String {
        let id = Uuid::new_v4().to_string();
        self.register(&id, client_info);
        id
    }

    /// Register (or refresh) a session under a caller-supplied identifier
    pub fn register(&self, id: &str, client_info: Value) {
        self.sessions.insert(
            id.to_owned(),
            ProtocolSession {
                id: id.to_owned(),
                client_info,
                created_at: Utc::now(),
                last_seen: Instant::now(),
            },
        );
    }

    /// Refresh a session's idle timer; returns whether it exists
    pub fn touch(&self, id: &str) -> bool {
        self.sessions.get_mut(id).is_some_and(|mut session| {
            session.last_seen = Instant::now();
            true
        })
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Evict sessions idle longer than the TTL; returns how many went
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.last_seen.elapsed() < ttl);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!("Evicted {evicted} idle protocol sessions");
        }
        evicted
    }

    /// Spawn the background eviction task
    pub fn spawn_sweeper(registry: Arc<Self>, interval: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                registry.sweep();
            }
        });
    }
}
