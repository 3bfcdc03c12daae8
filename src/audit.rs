// ABOUTME: Fire-and-forget audit sink for completed dispatch outcomes
// ABOUTME: Appends records asynchronously; failures are logged, never raised
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Audit sink.
//!
//! Every `tools/call` that reaches the fabricator produces exactly one
//! record here. The append runs in a detached task so it can neither fail
//! nor delay the primary response.

use mimic_core::AuditRecord;
use tracing::{info, warn};

use crate::storage::SharedStorage;

/// Thin adapter between the dispatch engine and audit storage
#[derive(Clone)]
pub struct AuditSink {
    storage: SharedStorage,
}

impl AuditSink {
    /// Create a sink over the given storage
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Record one dispatch outcome, fire-and-forget
    pub fn record(&self, record: AuditRecord) {
        info!(
            record_id = %record.record_id,
            product = %format!("{}/{}", record.category, record.product),
            action = %record.action,
            success = record.success,
            "dispatch audited"
        );
        let storage = self.storage.clone();
        tokio::spawn(async move {
            if let Err(e) = storage.append_audit_record(&record).await {
                warn!(record_id = %record.record_id, "Failed to append audit record: {e}");
            }
        });
    }
}
