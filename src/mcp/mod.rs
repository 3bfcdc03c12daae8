// ABOUTME: MCP protocol module organization
// ABOUTME: Router, sessions, schema projection, resources, and server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

/// Protocol method router and dispatch state machine
pub mod router;

/// Tool schema projection for `tools/list`
pub mod schema;

/// Shared server resources (dependency injection)
pub mod resources;

/// Ephemeral protocol session registry
pub mod sessions;

/// Axum server orchestration
pub mod server;

pub use resources::ServerResources;
pub use router::{DispatchContext, DispatchOutcome, MethodRouter};
pub use server::SimulatorMcpServer;
