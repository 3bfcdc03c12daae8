// ABOUTME: JSON-RPC 2.0 envelope types used by the MCP dispatch path
// ABOUTME: Request/response/error shapes plus notification detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! JSON-RPC 2.0 foundation.
//!
//! A request with no `id` (or an explicit `null` id, which serde collapses
//! to the same thing) is a notification and receives no response. Responses
//! always carry an `id` field, `null` when the request supplied none.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::protocol::JSONRPC_VERSION;
use crate::errors::{AppError, AppResult};

/// Inbound JSON-RPC request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Version marker; must be `"2.0"`
    pub jsonrpc: String,
    /// Method name, e.g. `tools/call`
    pub method: String,
    /// Method-dependent parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Request id; absence (or `null`) marks a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Whether this envelope is a notification (no id to respond to)
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The id to echo in a response: the request's, or `null`
    #[must_use]
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }

    /// Check version and method fields of the envelope.
    ///
    /// # Errors
    /// Returns an invalid-input error when `jsonrpc` is not `"2.0"` or the
    /// method name is empty.
    pub fn validate_envelope(&self) -> AppResult<()> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(AppError::invalid_input(format!(
                "Unsupported JSON-RPC version: {:?}",
                self.jsonrpc
            )));
        }
        if self.method.is_empty() {
            return Err(AppError::invalid_input("Missing JSON-RPC method"));
        }
        Ok(())
    }
}

/// Outbound JSON-RPC response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Version marker, always `"2.0"`
    pub jsonrpc: String,
    /// Result payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error object on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Echoed request id (`null` when the request had none)
    pub id: Value,
}

impl JsonRpcResponse {
    /// Successful response carrying `result`
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Failed response carrying an error object
    #[must_use]
    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Optional structured detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create an error object without extra data
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn null_id_is_a_notification() {
        let with_null: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "ping", "id": null}))
                .unwrap();
        assert!(with_null.is_notification());

        let without: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap();
        assert!(without.is_notification());

        let with_id: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "ping", "id": 7})).unwrap();
        assert!(!with_id.is_notification());
        assert_eq!(with_id.response_id(), json!(7));
    }

    #[test]
    fn envelope_validation_rejects_wrong_version() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "1.0", "method": "ping"})).unwrap();
        assert!(request.validate_envelope().is_err());
    }

    #[test]
    fn response_serializes_null_id_explicitly() {
        let response = JsonRpcResponse::success(Value::Null, json!({}));
        let encoded = serde_json::to_string(&response).unwrap();
        assert!(encoded.contains("\"id\":null"));
        assert!(!encoded.contains("error"));
    }
}
