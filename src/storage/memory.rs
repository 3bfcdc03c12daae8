// ABOUTME: In-memory storage backend for tests and ephemeral runs
// ABOUTME: DashMap-backed tables with the same semantics as the sqlite backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use mimic_core::{AuditRecord, CapabilityToken, ProductDescriptor};

use super::StorageProvider;
use crate::errors::{AppError, AppResult};

/// In-memory storage; every table is process-local.
///
/// Shares the `StorageProvider` semantics of the sqlite backend: lookups
/// only surface enabled rows, grants are a plain many-to-many set, audit
/// records are append-only.
#[derive(Default)]
pub struct MemoryStorage {
    tokens: DashMap<String, CapabilityToken>,
    products: DashMap<i64, ProductDescriptor>,
    grants: DashMap<i64, Vec<i64>>,
    audits: Mutex<Vec<AuditRecord>>,
    next_id: AtomicI64,
}

impl MemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Snapshot of all appended audit records (test inspection)
    ///
    /// # Panics
    /// Panics if the internal audit mutex was poisoned by a panicking test.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.audits.lock().unwrap().clone()
    }

    /// Disable a token in place (test helper)
    pub fn disable_token(&self, token: &str) {
        if let Some(mut entry) = self.tokens.get_mut(token) {
            entry.enabled = false;
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn lookup_token(&self, token: &str) -> AppResult<Option<CapabilityToken>> {
        Ok(self
            .tokens
            .get(token)
            .filter(|t| t.enabled)
            .map(|t| t.clone()))
    }

    async fn lookup_product(
        &self,
        category: &str,
        name: &str,
    ) -> AppResult<Option<ProductDescriptor>> {
        Ok(self
            .products
            .iter()
            .find(|p| p.enabled && p.category == category && p.name == name)
            .map(|p| p.clone()))
    }

    async fn list_granted_products(&self, token: &str) -> AppResult<Vec<ProductDescriptor>> {
        let Some(token_record) = self.tokens.get(token).filter(|t| t.enabled) else {
            return Ok(Vec::new());
        };
        let granted = self
            .grants
            .get(&token_record.id)
            .map(|ids| ids.clone())
            .unwrap_or_default();
        Ok(granted
            .iter()
            .filter_map(|id| self.products.get(id))
            .filter(|p| p.enabled)
            .map(|p| p.clone())
            .collect())
    }

    async fn touch_token(&self, token_id: i64) -> AppResult<()> {
        for mut entry in self.tokens.iter_mut() {
            if entry.id == token_id {
                entry.last_used = Some(Utc::now());
                return Ok(());
            }
        }
        Err(AppError::database(format!("No token with id {token_id}")))
    }

    async fn append_audit_record(&self, record: &AuditRecord) -> AppResult<()> {
        self.audits
            .lock()
            .map_err(|_| AppError::database("Audit lock poisoned"))?
            .push(record.clone());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_product(&self, descriptor: &ProductDescriptor) -> AppResult<i64> {
        descriptor
            .validate()
            .map_err(|e| AppError::invalid_input(e.to_string()))?;
        let id = self.allocate_id();
        let mut stored = descriptor.clone();
        stored.id = id;
        self.products.insert(id, stored);
        Ok(id)
    }

    async fn create_token(
        &self,
        name: &str,
        user_id: i64,
        token: &str,
    ) -> AppResult<CapabilityToken> {
        let record = CapabilityToken {
            id: self.allocate_id(),
            token: token.to_owned(),
            name: name.to_owned(),
            user_id,
            enabled: true,
            created_at: Utc::now(),
            last_used: None,
        };
        self.tokens.insert(token.to_owned(), record.clone());
        Ok(record)
    }

    async fn grant_product(&self, token_id: i64, product_id: i64) -> AppResult<()> {
        let mut grants = self.grants.entry(token_id).or_default();
        if !grants.contains(&product_id) {
            grants.push(product_id);
        }
        Ok(())
    }
}
