// ABOUTME: Storage abstraction consumed by the dispatch engine
// ABOUTME: Async repository trait with sqlite and in-memory backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Storage abstraction.
//!
//! The dispatch engine never talks to a database directly; it consumes this
//! repository trait. `SqliteStorage` is the production backend,
//! `MemoryStorage` backs tests and ephemeral runs. Both provide their own
//! internal synchronization, so a single shared instance serves all
//! concurrent requests.

use std::sync::Arc;

use async_trait::async_trait;
use mimic_core::{AuditRecord, CapabilityToken, ProductDescriptor};

use crate::errors::AppResult;

/// In-memory backend (tests, ephemeral runs)
pub mod memory;

/// `SQLite` backend via sqlx
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Shared handle to a storage backend
pub type SharedStorage = Arc<dyn StorageProvider>;

/// Repository operations the dispatch engine depends on
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Resolve an enabled capability token by its opaque string.
    ///
    /// # Errors
    /// Returns a database error when the lookup fails.
    async fn lookup_token(&self, token: &str) -> AppResult<Option<CapabilityToken>>;

    /// Resolve an enabled product descriptor by `(category, name)`.
    ///
    /// # Errors
    /// Returns a database error when the lookup fails.
    async fn lookup_product(
        &self,
        category: &str,
        name: &str,
    ) -> AppResult<Option<ProductDescriptor>>;

    /// List every enabled product the token holds a grant for.
    ///
    /// # Errors
    /// Returns a database error when the query fails.
    async fn list_granted_products(&self, token: &str) -> AppResult<Vec<ProductDescriptor>>;

    /// Record that a token was used just now (best-effort side effect).
    ///
    /// # Errors
    /// Returns a database error when the update fails; callers treat this
    /// as non-fatal.
    async fn touch_token(&self, token_id: i64) -> AppResult<()>;

    /// Append one immutable audit record.
    ///
    /// # Errors
    /// Returns a database error when the insert fails; callers treat this
    /// as non-fatal.
    async fn append_audit_record(&self, record: &AuditRecord) -> AppResult<()>;

    /// Verify storage connectivity for health probes.
    ///
    /// # Errors
    /// Returns a database error when the backend is unreachable.
    async fn health_check(&self) -> AppResult<()>;

    /// Insert a product descriptor, returning its storage id.
    ///
    /// # Errors
    /// Returns invalid-input on descriptor validation failure or a database
    /// error on insert failure.
    async fn create_product(&self, descriptor: &ProductDescriptor) -> AppResult<i64>;

    /// Create a capability token with the given opaque string.
    ///
    /// # Errors
    /// Returns a database error when the insert fails.
    async fn create_token(
        &self,
        name: &str,
        user_id: i64,
        token: &str,
    ) -> AppResult<CapabilityToken>;

    /// Grant a token access to a product.
    ///
    /// # Errors
    /// Returns a database error when the insert fails.
    async fn grant_product(&self, token_id: i64, product_id: i64) -> AppResult<()>;
}
