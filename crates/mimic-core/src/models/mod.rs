// ABOUTME: Model module organization for mimic-core DTOs
// ABOUTME: Splits product schema, token, and audit definitions by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

/// Product descriptors, action definitions, and parameter schemas
pub mod product;

/// Capability token records
pub mod token;

/// Immutable dispatch audit records
pub mod audit;

pub use audit::AuditRecord;
pub use product::{
    validate_slug, ActionDefinition, ModelError, ParameterDefinition, ParameterType,
    ProductDescriptor,
};
pub use token::CapabilityToken;
