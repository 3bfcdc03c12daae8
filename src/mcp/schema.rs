// ABOUTME: Tool schema projection from action definitions to MCP tool listings
// ABOUTME: Pure, deterministic mapping onto JSON-Schema-shaped inputSchema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Tool Schema Projector.
//!
//! Converts an [`ActionDefinition`] into the MCP `tools/list` entry shape.
//! Referentially transparent: identical input yields byte-identical output.

use mimic_core::{ActionDefinition, ParameterType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One entry of a `tools/list` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (the action name)
    pub name: String,
    /// Display name and description, concatenated
    pub description: String,
    /// JSON-Schema object describing the arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Project an action definition into its tool-listing schema.
#[must_use]
pub fn project(action: &ActionDefinition) -> ToolSchema {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &action.parameters {
        let schema_type = schema_type_for(param.kind);
        let mut property = Map::new();
        property.insert("type".to_owned(), Value::String(schema_type.to_owned()));
        property.insert(
            "description".to_owned(),
            Value::String(param.description.clone().unwrap_or_default()),
        );
        if let Some(default) = &param.default {
            property.insert("default".to_owned(), default.clone());
        }
        if let Some(options) = &param.options {
            if !options.is_empty() {
                property.insert("enum".to_owned(), Value::Array(options.clone()));
            }
        }
        if schema_type == "array" {
            // Items typed as string by convention
            property.insert("items".to_owned(), json!({"type": "string"}));
        }
        properties.insert(param.key.clone(), Value::Object(property));
        if param.required {
            required.push(Value::String(param.key.clone()));
        }
    }

    let display = if action.display_name.is_empty() {
        action.name.as_str()
    } else {
        action.display_name.as_str()
    };
    let description = action.description.as_deref().unwrap_or_default();

    ToolSchema {
        name: action.name.clone(),
        description: format!("{display} - {description}"),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

/// JSON-Schema type label for a declared parameter type.
///
/// `Object` deliberately falls into the string arm: the reference projector
/// maps everything outside integer/boolean/array onto `"string"`.
const fn schema_type_for(kind: ParameterType) -> &'static str {
    match kind {
        ParameterType::Integer => "integer",
        ParameterType::Boolean => "boolean",
        ParameterType::Array => "array",
        ParameterType::String | ParameterType::Object => "string",
    }
}
