// ABOUTME: Main library entry point for the Mimic MCP simulator platform
// ABOUTME: Simulates vendor product APIs behind the MCP protocol
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

#![deny(unsafe_code)]

//! # Mimic MCP Server
//!
//! A multi-tenant Model Context Protocol (MCP) server that pretends to be
//! dozens of different vendor products (firewalls, IM platforms, ticketing
//! systems, network devices) behind one protocol. Each simulated product is
//! described declaratively and stored as data; calls are dispatched against
//! that schema and answered by a generative response fabricator or static
//! templates.
//!
//! ## Architecture
//!
//! - **Storage**: repository trait over sqlite (production) or memory (tests)
//! - **Access gate**: capability-token authorization per product
//! - **Protocol router**: the MCP method state machine
//! - **Fabricator**: pluggable response synthesis (LLM or templates)
//! - **Audit**: fire-and-forget records of every completed dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mimic_mcp_server::config::ServerConfig;
//! use mimic_mcp_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Mimic MCP Server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Access control gate resolving tokens to product authorizations
pub mod access;

/// Fire-and-forget audit sink
pub mod audit;

/// Configuration management (environment-only)
pub mod config;

/// Application constants
pub mod constants;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Response fabricator backends (LLM and static templates)
pub mod fabricator;

/// JSON-RPC 2.0 envelope foundation
pub mod jsonrpc;

/// Production logging and structured output
pub mod logging;

/// Model Context Protocol implementation: router, sessions, schema, server
pub mod mcp;

/// HTTP routes for health and product dispatch
pub mod routes;

/// Storage abstraction with sqlite and in-memory backends
pub mod storage;

/// Parameter validation for tool calls
pub mod validation;
