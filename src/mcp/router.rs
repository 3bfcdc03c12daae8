// ABOUTME: Protocol method router dispatching MCP methods to their handlers
// ABOUTME: initialize, tools/list, tools/call, ping, notifications, unknown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Protocol Method Router.
//!
//! Method-keyed rather than a generic registry: the method set is small and
//! fixed, and each method has materially different side effects. Requests
//! (an `id` is present) always get a response; the only pure notification,
//! `notifications/initialized` without an id, produces nothing.

use std::sync::Arc;

use mimic_core::{AuditRecord, CapabilityToken, ProductDescriptor};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::resources::ServerResources;
use super::schema;
use crate::constants::errors::{ERROR_INVALID_PARAMS, ERROR_METHOD_NOT_FOUND};
use crate::constants::protocol::{PROTOCOL_VERSION, SERVER_INSTRUCTIONS};
use crate::constants::service_names::MIMIC_MCP_SERVER;
use crate::fabricator::fabricate_with_deadline;
use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::validation::{advisory_mismatches, validate};

/// Per-call context resolved by the HTTP boundary
pub struct DispatchContext<'a> {
    /// The product this call is scoped to
    pub product: &'a ProductDescriptor,
    /// The authorized capability token
    pub token: &'a CapabilityToken,
    /// Session identifier from the request header, if any
    pub session_id: Option<&'a str>,
    /// Caller network address, if known
    pub source_ip: Option<String>,
}

/// Result of routing one envelope
pub struct DispatchOutcome {
    /// Response to transmit; `None` for pure notifications
    pub response: Option<JsonRpcResponse>,
    /// Set when `initialize` minted a fresh session id
    pub new_session_id: Option<String>,
}

impl DispatchOutcome {
    fn reply(response: JsonRpcResponse) -> Self {
        Self {
            response: Some(response),
            new_session_id: None,
        }
    }

    const fn silence() -> Self {
        Self {
            response: None,
            new_session_id: None,
        }
    }
}

/// Dispatches protocol methods against a bound product context
pub struct MethodRouter {
    resources: Arc<ServerResources>,
}

impl MethodRouter {
    /// Create a router over the shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Route one request to its handler.
    ///
    /// Never fails: protocol-level problems become JSON-RPC error objects,
    /// call-level problems become tool results describing the failure.
    pub async fn dispatch(
        &self,
        request: &JsonRpcRequest,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        debug!(
            method = %request.method,
            product = %ctx.product.path(),
            "routing protocol method"
        );
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request, ctx),
            "tools/list" => self.handle_tools_list(request, ctx),
            "tools/call" => self.handle_tools_call(request, ctx).await,
            "ping" => Self::handle_ping(request),
            "notifications/initialized" => Self::handle_initialized_notification(request),
            other => {
                debug!("unknown protocol method {other:?}");
                DispatchOutcome::reply(JsonRpcResponse::failure(
                    request.response_id(),
                    JsonRpcError::new(ERROR_METHOD_NOT_FOUND, "Method not found"),
                ))
            }
        }
    }

    /// `initialize`: allocate a session and report server identity
    fn handle_initialize(
        &self,
        request: &JsonRpcRequest,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        let client_info = request
            .params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .cloned()
            .unwrap_or(Value::Null);

        // A caller re-initializing with an existing session keeps its id;
        // otherwise a fresh one is minted and returned via response header.
        let new_session_id = match ctx.session_id {
            Some(existing) => {
                self.resources.sessions.register(existing, client_info);
                None
            }
            None => Some(self.resources.sessions.create(client_info)),
        };

        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "experimental": {},
                "prompts": {"listChanged": true},
                "resources": {"subscribe": false, "listChanged": true},
                "tools": {"listChanged": true}
            },
            "serverInfo": {
                "name": MIMIC_MCP_SERVER,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": SERVER_INSTRUCTIONS
        });

        DispatchOutcome {
            response: Some(JsonRpcResponse::success(request.response_id(), result)),
            new_session_id,
        }
    }

    /// `tools/list`: project every action of the bound product
    fn handle_tools_list(
        &self,
        request: &JsonRpcRequest,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        self.consult_session(ctx);
        let tools: Vec<_> = ctx.product.actions.iter().map(schema::project).collect();
        DispatchOutcome::reply(JsonRpcResponse::success(
            request.response_id(),
            json!({ "tools": tools }),
        ))
    }

    /// `tools/call`: validate, fabricate, audit
    async fn handle_tools_call(
        &self,
        request: &JsonRpcRequest,
        ctx: &DispatchContext<'_>,
    ) -> DispatchOutcome {
        self.consult_session(ctx);

        let params = request.params.as_ref();
        let Some(action_name) = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
        else {
            return DispatchOutcome::reply(JsonRpcResponse::failure(
                request.response_id(),
                JsonRpcError::new(ERROR_INVALID_PARAMS, "Missing tool name"),
            ));
        };
        let arguments: Map<String, Value> = params
            .and_then(|p| p.get("arguments"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        // Action lookup and required-parameter checks short-circuit before
        // any audit write or fabricator invocation.
        let Some(action_def) = ctx.product.find_action(action_name) else {
            return DispatchOutcome::reply(Self::tool_result(
                request,
                &json!({
                    "error": format!("Action {action_name} not found"),
                    "code": 404
                }),
            ));
        };

        if let Err(e) = validate(action_def, &arguments) {
            debug!(
                product = %ctx.product.path(),
                action = action_name,
                "rejected call: {e}"
            );
            return DispatchOutcome::reply(Self::tool_result(
                request,
                &json!({ "error": e.to_string(), "code": 400 }),
            ));
        }
        for note in advisory_mismatches(action_def, &arguments) {
            warn!(
                product = %ctx.product.path(),
                action = action_name,
                "argument deviates from schema: {note}"
            );
        }

        let arguments_value = Value::Object(arguments);
        let fabricated = fabricate_with_deadline(
            self.resources.fabricator.as_ref(),
            ctx.product,
            action_name,
            &arguments_value,
            action_def,
            self.resources.config.fabricator.timeout,
        )
        .await;

        let (payload, success) = match fabricated {
            Ok(response) => (response, true),
            Err(e) => {
                warn!(
                    product = %ctx.product.path(),
                    action = action_name,
                    "fabrication failed: {e}"
                );
                (
                    json!({
                        "success": false,
                        "error": e.to_string(),
                        "code": 500,
                        "product": ctx.product.path(),
                        "action": action_name
                    }),
                    false,
                )
            }
        };

        let mut record = AuditRecord::new(
            ctx.product.category.clone(),
            ctx.product.name.clone(),
            action_name.to_owned(),
            arguments_value,
            payload.clone(),
            success,
        )
        .with_token(ctx.token.id, ctx.token.name.clone())
        .with_product_id(ctx.product.id);
        if let Some(ip) = &ctx.source_ip {
            record = record.with_source_ip(ip.clone());
        }
        self.resources.audit.record(record);

        DispatchOutcome::reply(Self::tool_result(request, &payload))
    }

    /// `ping`: liveness probe, empty result
    fn handle_ping(request: &JsonRpcRequest) -> DispatchOutcome {
        DispatchOutcome::reply(JsonRpcResponse::success(request.response_id(), json!({})))
    }

    /// `notifications/initialized`: respond only when the caller attached
    /// an id (non-standard but preserved for client compatibility)
    fn handle_initialized_notification(request: &JsonRpcRequest) -> DispatchOutcome {
        if request.is_notification() {
            DispatchOutcome::silence()
        } else {
            DispatchOutcome::reply(JsonRpcResponse::success(request.response_id(), json!({})))
        }
    }

    /// Wrap a payload as a single text-content tool result
    fn tool_result(request: &JsonRpcRequest, payload: &Value) -> JsonRpcResponse {
        let text =
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        JsonRpcResponse::success(
            request.response_id(),
            json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            }),
        )
    }

    /// Session lookup is lenient: an unknown or absent session id is served
    /// anyway, but logged.
    fn consult_session(&self, ctx: &DispatchContext<'_>) {
        match ctx.session_id {
            Some(id) => {
                if !self.resources.sessions.touch(id) {
                    warn!(session_id = id, "call references unknown or expired session");
                }
            }
            None => debug!("call arrived without a session id"),
        }
    }
}
