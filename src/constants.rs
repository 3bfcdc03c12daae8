// ABOUTME: Application constants shared across protocol and transport layers
// ABOUTME: JSON-RPC versions, protocol identifiers, and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

/// Protocol-level constants
pub mod protocol {
    /// JSON-RPC version accepted and emitted
    pub const JSONRPC_VERSION: &str = "2.0";

    /// MCP protocol revision advertised by `initialize`
    pub const PROTOCOL_VERSION: &str = "2025-06-18";

    /// Header carrying the protocol session identifier
    pub const SESSION_HEADER: &str = "mcp-session-id";

    /// Instructions string returned from `initialize`
    pub const SERVER_INSTRUCTIONS: &str =
        "Mimic Simulator - dynamically simulates vendor product APIs behind the MCP protocol";
}

/// JSON-RPC error codes
pub mod errors {
    /// Method not found
    pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;

    /// Invalid params
    pub const ERROR_INVALID_PARAMS: i32 = -32602;

    /// Internal error
    pub const ERROR_INTERNAL_ERROR: i32 = -32603;
}

/// Service identity strings
pub mod service_names {
    /// Canonical service name used in health and `serverInfo` payloads
    pub const MIMIC_MCP_SERVER: &str = "mimic-mcp-server";
}
