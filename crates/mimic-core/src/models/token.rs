// ABOUTME: Capability token record granting access to simulated products
// ABOUTME: Opaque bearer credential with enabled flag and last-used tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque bearer credential owned by one identity.
///
/// Tokens never expire on their own; administrators disable or delete them.
/// The set of products a token may reach lives in the grant table, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityToken {
    /// Storage identifier
    pub id: i64,
    /// The opaque token string presented by callers
    pub token: String,
    /// Administrative label, recorded in audit entries
    pub name: String,
    /// Owning identity
    pub user_id: i64,
    /// Disabled tokens fail validation without being deleted
    pub enabled: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Updated best-effort on every successful validation
    pub last_used: Option<DateTime<Utc>>,
}
