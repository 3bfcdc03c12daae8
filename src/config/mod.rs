// ABOUTME: Configuration module organization for the Mimic MCP server
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

/// Environment-variable driven server configuration
pub mod environment;

pub use environment::{FabricatorConfig, ServerConfig, SessionConfig};
