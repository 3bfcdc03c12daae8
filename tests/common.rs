// ABOUTME: Shared test fixtures: in-memory storage, demo products, tokens
// ABOUTME: Builders for server resources with pluggable fabricators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors
#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use mimic_core::{ActionDefinition, CapabilityToken, ProductDescriptor};
use mimic_mcp_server::config::{FabricatorConfig, ServerConfig, SessionConfig};
use mimic_mcp_server::fabricator::{
    FabricatorError, ResponseFabricator, TemplateFabricator,
};
use mimic_mcp_server::mcp::resources::ServerResources;
use mimic_mcp_server::storage::{MemoryStorage, SharedStorage, StorageProvider};

/// Fabricator that always fails, simulating an upstream outage
pub struct FailingFabricator;

#[async_trait]
impl ResponseFabricator for FailingFabricator {
    async fn fabricate(
        &self,
        _product: &ProductDescriptor,
        _action: &str,
        _params: &Value,
        _action_def: &ActionDefinition,
    ) -> Result<Value, FabricatorError> {
        Err(FabricatorError::Upstream("simulated outage".to_owned()))
    }
}

/// Fabricator that counts invocations, delegating to the template backend
pub struct CountingFabricator {
    inner: TemplateFabricator,
    calls: AtomicUsize,
}

impl CountingFabricator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: TemplateFabricator::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseFabricator for CountingFabricator {
    async fn fabricate(
        &self,
        product: &ProductDescriptor,
        action: &str,
        params: &Value,
        action_def: &ActionDefinition,
    ) -> Result<Value, FabricatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fabricate(product, action, params, action_def).await
    }
}

/// Test-scoped server configuration (never reads the environment)
pub fn test_config() -> Arc<ServerConfig> {
    Arc::new(ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        fabricator: FabricatorConfig {
            api_key: None,
            base_url: "http://localhost:0".to_owned(),
            model: "test-model".to_owned(),
            timeout: Duration::from_secs(2),
        },
        session: SessionConfig::default(),
    })
}

/// The firewall descriptor used across suites
pub fn firewall_descriptor() -> ProductDescriptor {
    serde_json::from_value(json!({
        "id": 0,
        "category": "Firewall",
        "name": "USGFirewall",
        "display_name": "USG Firewall",
        "description": "Unified security gateway firewall management",
        "actions": [
            {
                "name": "check_firewall_health",
                "display_name": "Check firewall health",
                "parameters": []
            },
            {
                "name": "block_ip_address",
                "display_name": "Block IP address",
                "description": "Add an IP address to the deny list",
                "parameters": [
                    {"key": "ip_address", "type": "String", "required": true, "description": "IP to block"},
                    {"key": "duration_minutes", "type": "Integer", "required": false, "default": 60}
                ]
            }
        ],
        "created_at": Utc::now(),
        "updated_at": Utc::now()
    }))
    .unwrap()
}

/// Everything a suite needs to drive the dispatch engine
pub struct TestHarness {
    pub resources: Arc<ServerResources>,
    pub storage: Arc<MemoryStorage>,
    pub token: CapabilityToken,
    pub product: ProductDescriptor,
}

/// Seed an in-memory store with the firewall product and a granted token,
/// wiring the given fabricator into fresh server resources.
pub async fn harness_with_fabricator(
    fabricator: Arc<dyn ResponseFabricator>,
) -> TestHarness {
    let storage = Arc::new(MemoryStorage::new());
    let shared: SharedStorage = storage.clone();

    let product_id = shared.create_product(&firewall_descriptor()).await.unwrap();
    let token = shared
        .create_token("test-token", 1, "tok-test-0001")
        .await
        .unwrap();
    shared.grant_product(token.id, product_id).await.unwrap();
    let product = shared
        .lookup_product("Firewall", "USGFirewall")
        .await
        .unwrap()
        .unwrap();

    let resources = Arc::new(ServerResources::new(shared, fabricator, test_config()));
    TestHarness {
        resources,
        storage,
        token,
        product,
    }
}

/// Default harness with the template fabricator
pub async fn harness() -> TestHarness {
    harness_with_fabricator(Arc::new(TemplateFabricator::new())).await
}

/// Give spawned fire-and-forget tasks (audit appends, token touches) a
/// chance to run before asserting on their effects.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
