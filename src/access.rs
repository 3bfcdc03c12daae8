// ABOUTME: Access control gate resolving capability tokens to product access
// ABOUTME: Enforces token -> product -> grant check ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Access control gate.
//!
//! `authorize` checks, in order: token validity, product existence, grant
//! presence. The ordering determines which error a caller sees and is
//! relied on for predictable diagnostics; all three conditions must hold
//! regardless, so it carries no security weight.

use mimic_core::{CapabilityToken, ProductDescriptor};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::storage::SharedStorage;

/// Outcome classification of an authorization attempt
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Token absent, unknown, or disabled
    #[error("Invalid token")]
    InvalidToken,
    /// No enabled product matches the requested path
    #[error("Product {0} not found")]
    ProductNotFound(String),
    /// Token is valid but holds no grant for the product
    #[error("Access denied")]
    AccessDenied,
    /// Storage failure during one of the checks
    #[error(transparent)]
    Storage(AppError),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidToken => Self::auth_invalid("Invalid token"),
            AccessError::ProductNotFound(path) => {
                Self::not_found(format!("Product {path} not found"))
            }
            AccessError::AccessDenied => Self::permission_denied("Access denied"),
            AccessError::Storage(e) => e,
        }
    }
}

/// Successful authorization: the resolved identity and product
#[derive(Debug, Clone)]
pub struct Authorization {
    /// The validated capability token
    pub token: CapabilityToken,
    /// The resolved product descriptor
    pub product: ProductDescriptor,
}

/// Stateless verification against the storage collaborator
#[derive(Clone)]
pub struct AccessGate {
    storage: SharedStorage,
}

impl AccessGate {
    /// Create a gate over the given storage
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Authorize a token for `(category, name)`.
    ///
    /// On success the token's last-used timestamp is updated in a spawned
    /// task; a failure there is logged and never fails the request.
    ///
    /// # Errors
    /// Exactly one of [`AccessError::InvalidToken`],
    /// [`AccessError::ProductNotFound`], [`AccessError::AccessDenied`], in
    /// that precedence, or [`AccessError::Storage`] when a lookup fails.
    pub async fn authorize(
        &self,
        token: &str,
        category: &str,
        name: &str,
    ) -> Result<Authorization, AccessError> {
        if token.is_empty() {
            return Err(AccessError::InvalidToken);
        }

        let token_record = self
            .storage
            .lookup_token(token)
            .await
            .map_err(AccessError::Storage)?
            .ok_or(AccessError::InvalidToken)?;

        let product = self
            .storage
            .lookup_product(category, name)
            .await
            .map_err(AccessError::Storage)?
            .ok_or_else(|| AccessError::ProductNotFound(format!("{category}/{name}")))?;

        let granted = self
            .storage
            .list_granted_products(token)
            .await
            .map_err(AccessError::Storage)?;
        if !granted.iter().any(|p| p.id == product.id) {
            warn!(
                token_name = %token_record.name,
                product = %product.path(),
                "token holds no grant for product"
            );
            return Err(AccessError::AccessDenied);
        }

        debug!(
            token_name = %token_record.name,
            product = %product.path(),
            "authorized"
        );
        self.touch_last_used(token_record.id);

        Ok(Authorization {
            token: token_record,
            product,
        })
    }

    /// Best-effort last-used update, detached from the request path
    fn touch_last_used(&self, token_id: i64) {
        let storage = self.storage.clone();
        tokio::spawn(async move {
            if let Err(e) = storage.touch_token(token_id).await {
                warn!("Failed to record token last-used timestamp: {e}");
            }
        });
    }
}
