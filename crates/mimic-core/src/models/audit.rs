// ABOUTME: Immutable audit record for completed dispatch attempts
// ABOUTME: Captures identity, product, action, parameters, and outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One completed `tools/call` dispatch, successful or not.
///
/// Records are write-once: the dispatch engine appends them and never reads
/// them back. Creation for a call happens exactly once, after the fabricator
/// has been invoked; short-circuited calls produce no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record identifier
    pub record_id: Uuid,
    /// Storage id of the calling token, when resolved
    pub token_id: Option<i64>,
    /// Administrative label of the calling token
    pub token_name: Option<String>,
    /// Storage id of the dispatched product, when resolved
    pub product_id: Option<i64>,
    /// Category slug of the dispatched product
    pub category: String,
    /// Product slug
    pub product: String,
    /// Action name that was invoked
    pub action: String,
    /// The caller's argument map, verbatim
    pub parameters: Value,
    /// The produced response, or the failure payload
    pub response: Value,
    /// Whether the fabricator produced a response
    pub success: bool,
    /// Caller network address, when known
    pub source_ip: Option<String>,
    /// Record creation time
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Create a record for one dispatch outcome
    #[must_use]
    pub fn new(
        category: String,
        product: String,
        action: String,
        parameters: Value,
        response: Value,
        success: bool,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            token_id: None,
            token_name: None,
            product_id: None,
            category,
            product,
            action,
            parameters,
            response,
            success,
            source_ip: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the resolved token identity
    #[must_use]
    pub fn with_token(mut self, token_id: i64, token_name: String) -> Self {
        self.token_id = Some(token_id);
        self.token_name = Some(token_name);
        self
    }

    /// Attach the resolved product id
    #[must_use]
    pub const fn with_product_id(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Attach the caller's network address
    #[must_use]
    pub fn with_source_ip(mut self, source_ip: String) -> Self {
        self.source_ip = Some(source_ip);
        self
    }
}
