// ABOUTME: Health check route reporting service and storage status
// ABOUTME: 200 with service metadata when storage responds, 500 otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::constants::service_names::MIMIC_MCP_SERVER;
use crate::mcp::resources::ServerResources;

/// Health check route handlers
pub struct HealthRoutes;

impl HealthRoutes {
    /// Build the health router
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health).options(Self::preflight))
            .with_state(resources)
    }

    /// CORS preflight: 200 with no body
    async fn preflight() -> StatusCode {
        StatusCode::OK
    }

    /// Probe storage connectivity and report service status
    async fn health(State(resources): State<Arc<ServerResources>>) -> Response {
        match resources.storage.health_check().await {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({
                    "status": "healthy",
                    "service": MIMIC_MCP_SERVER,
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": Utc::now().to_rfc3339()
                })),
            )
                .into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                    "timestamp": Utc::now().to_rfc3339()
                })),
            )
                .into_response(),
        }
    }
}
