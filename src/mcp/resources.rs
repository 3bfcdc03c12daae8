// ABOUTME: Dependency injection container for server-wide shared resources
// ABOUTME: Storage, fabricator, sessions, audit sink, and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use std::sync::Arc;

use crate::audit::AuditSink;
use crate::config::ServerConfig;
use crate::fabricator::ResponseFabricator;
use crate::mcp::sessions::SessionRegistry;
use crate::storage::SharedStorage;

/// Shared resources injected into every handler.
///
/// Built once at startup and passed around as `Arc<ServerResources>`; the
/// contained stores provide their own synchronization.
pub struct ServerResources {
    /// Token/product/audit repository
    pub storage: SharedStorage,
    /// Response fabricator backend
    pub fabricator: Arc<dyn ResponseFabricator>,
    /// Protocol session registry
    pub sessions: Arc<SessionRegistry>,
    /// Fire-and-forget audit sink
    pub audit: AuditSink,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from their parts
    #[must_use]
    pub fn new(
        storage: SharedStorage,
        fabricator: Arc<dyn ResponseFabricator>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            audit: AuditSink::new(storage.clone()),
            sessions: Arc::new(SessionRegistry::new(config.session.ttl)),
            storage,
            fabricator,
            config,
        }
    }
}
