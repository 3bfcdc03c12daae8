// ABOUTME: Route module organization for the simulator HTTP endpoints
// ABOUTME: Health probes plus the product-scoped MCP dispatch pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! HTTP route modules.
//!
//! Each module owns a `Router` factory following the
//! `XRoutes::routes(Arc<ServerResources>)` pattern; handlers stay thin and
//! delegate to the dispatch engine.

/// Health check and system status routes
pub mod health;

/// Product-scoped simulator endpoints (`/{category}/{product}`)
pub mod simulator;

pub use health::HealthRoutes;
pub use simulator::SimulatorRoutes;
