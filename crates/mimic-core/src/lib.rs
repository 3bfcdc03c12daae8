// ABOUTME: Core data model crate for the Mimic MCP simulator
// ABOUTME: Product descriptors, capability tokens, and audit record DTOs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! # mimic-core
//!
//! Canonical data definitions shared between the Mimic MCP server, its
//! storage backends, and its seed tooling. Everything in here is plain
//! data plus the validation logic that keeps it well-formed; no I/O.

/// Data transfer objects and their validation rules
pub mod models;

pub use models::{
    validate_slug, ActionDefinition, AuditRecord, CapabilityToken, ModelError, ParameterDefinition,
    ParameterType, ProductDescriptor,
};
