// ABOUTME: Product-scoped HTTP pipeline: parse path/token, authorize, dispatch
// ABOUTME: GET introspection, POST JSON-RPC over SSE framing, OPTIONS preflight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Request pipeline for `/{category}/{product}`.
//!
//! Check ordering is uniform and documented: structural problems (path
//! shape, content type, body parse, envelope shape) are rejected before any
//! storage lookup; authorization then proceeds token → product → grant.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mimic_core::validate_slug;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::access::AccessGate;
use crate::constants::protocol::SESSION_HEADER;
use crate::errors::AppError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::resources::ServerResources;
use crate::mcp::router::{DispatchContext, MethodRouter};

/// Query-string parameters accepted on product endpoints
#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Product-scoped simulator route handlers
pub struct SimulatorRoutes;

impl SimulatorRoutes {
    /// Build the simulator router
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/:category/:name",
                get(Self::describe_product)
                    .post(Self::dispatch_rpc)
                    .options(Self::preflight),
            )
            .with_state(resources)
    }

    /// Fallback for any path that is not exactly `/{category}/{product}`
    pub async fn invalid_path() -> Response {
        json_error(
            StatusCode::BAD_REQUEST,
            "Invalid path format. Expected: /Category/Product",
        )
    }

    /// CORS preflight: 200 with no body
    async fn preflight() -> StatusCode {
        StatusCode::OK
    }

    /// GET: introspection affordance returning the full product descriptor
    async fn describe_product(
        State(resources): State<Arc<ServerResources>>,
        Path((category, name)): Path<(String, String)>,
        Query(query): Query<TokenQuery>,
    ) -> Response {
        if validate_slug(&category).is_err() || validate_slug(&name).is_err() {
            return Self::invalid_path().await;
        }
        let Some(token) = query.token.filter(|t| !t.is_empty()) else {
            return json_error(StatusCode::UNAUTHORIZED, "Token required");
        };

        let gate = AccessGate::new(resources.storage.clone());
        match gate.authorize(&token, &category, &name).await {
            Ok(auth) => Json(json!({
                "category": auth.product.category,
                "name": auth.product.name,
                "display_name": auth.product.display_name,
                "description": auth.product.description,
                "actions": auth.product.actions
            }))
            .into_response(),
            Err(e) => AppError::from(e).into_response(),
        }
    }

    /// POST: the JSON-RPC dispatch path, framed as a single SSE event
    async fn dispatch_rpc(
        State(resources): State<Arc<ServerResources>>,
        Path((category, name)): Path<(String, String)>,
        Query(query): Query<TokenQuery>,
        connect_info: Option<ConnectInfo<SocketAddr>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        if validate_slug(&category).is_err() || validate_slug(&name).is_err() {
            return Self::invalid_path().await;
        }

        // Structural checks run before any authorization lookup
        if !content_type_is_json(&headers) {
            return json_error(
                StatusCode::BAD_REQUEST,
                "Content-Type must be application/json",
            );
        }
        let request: JsonRpcRequest = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid JSON-RPC request body: {e}"),
                );
            }
        };
        if let Err(e) = request.validate_envelope() {
            return e.into_response();
        }

        let Some(token) = query.token.filter(|t| !t.is_empty()) else {
            return json_error(StatusCode::UNAUTHORIZED, "Token required");
        };

        let gate = AccessGate::new(resources.storage.clone());
        let auth = match gate.authorize(&token, &category, &name).await {
            Ok(auth) => auth,
            Err(e) => return AppError::from(e).into_response(),
        };

        let session_id = headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok());
        let source_ip = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());

        let router = MethodRouter::new(resources.clone());
        let outcome = router
            .dispatch(
                &request,
                &DispatchContext {
                    product: &auth.product,
                    token: &auth.token,
                    session_id,
                    source_ip,
                },
            )
            .await;

        match outcome.response {
            Some(response) => sse_response(&response, outcome.new_session_id),
            // Pure notification: nothing to transmit
            None => StatusCode::ACCEPTED.into_response(),
        }
    }
}

fn content_type_is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Frame one JSON-RPC response as a single SSE event, attaching the newly
/// minted session id when `initialize` created one.
fn sse_response(response: &JsonRpcResponse, new_session_id: Option<String>) -> Response {
    let Ok(payload) = serde_json::to_string(response) else {
        return AppError::internal("Failed to encode dispatch response").into_response();
    };
    let frame = format!("event: message\ndata: {payload}\n\n");

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache");
    if let Some(session_id) = new_session_id {
        builder = builder.header(SESSION_HEADER, session_id);
    }
    builder.body(Body::from(frame)).unwrap_or_else(|e| {
        warn!("Failed to build SSE response: {e}");
        AppError::internal("Failed to frame dispatch response").into_response()
    })
}
