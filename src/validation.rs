// ABOUTME: Parameter validation for incoming tool call argument maps
// ABOUTME: Required-key presence is enforced; type/enum checks are advisory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Parameter validator.
//!
//! `validate` fails exactly when a required key is absent; extra keys and
//! value shapes never fail a call. `advisory_mismatches` reports type and
//! enum deviations separately so the dispatch path can log them without
//! changing the call's outcome.

use mimic_core::{ActionDefinition, ParameterType};
use serde_json::{Map, Value};

/// Validation failures that reject a call
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required parameter key is absent from the argument map
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
}

/// Check an argument map against an action's parameter schema.
///
/// # Errors
/// Returns [`ValidationError::MissingParameter`] for the first required key
/// (in declaration order) absent from `params`.
pub fn validate(action: &ActionDefinition, params: &Map<String, Value>) -> Result<(), ValidationError> {
    for key in action.required_keys() {
        if !params.contains_key(key) {
            return Err(ValidationError::MissingParameter(key.to_owned()));
        }
    }
    Ok(())
}

/// Report supplied values that deviate from the declared type or enum set.
///
/// Purely informational: deviations are logged by the caller, never
/// rejected.
#[must_use]
pub fn advisory_mismatches(action: &ActionDefinition, params: &Map<String, Value>) -> Vec<String> {
    let mut notes = Vec::new();
    for (key, value) in params {
        let Some(definition) = action.find_parameter(key) else {
            continue;
        };
        if !type_matches(definition.kind, value) {
            notes.push(format!(
                "parameter {key:?} is not a {}",
                definition.kind.as_str()
            ));
        }
        if let Some(options) = &definition.options {
            if !options.is_empty() && !options.contains(value) {
                notes.push(format!("parameter {key:?} is outside its declared options"));
            }
        }
    }
    notes
}

fn type_matches(kind: ParameterType, value: &Value) -> bool {
    match kind {
        ParameterType::String => value.is_string(),
        ParameterType::Integer => value.is_i64() || value.is_u64(),
        ParameterType::Boolean => value.is_boolean(),
        ParameterType::Array => value.is_array(),
        ParameterType::Object => value.is_object(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn firewall_block_action() -> ActionDefinition {
        serde_json::from_value(json!({
            "name": "block_ip_address",
            "display_name": "Block IP address",
            "parameters": [
                {"key": "ip_address", "type": "String", "required": true},
                {"key": "duration_minutes", "type": "Integer", "required": false, "default": 60},
                {"key": "mode", "type": "String", "required": false, "options": ["drop", "reject"]}
            ]
        }))
        .unwrap()
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn missing_required_key_fails() {
        let action = firewall_block_action();
        let err = validate(&action, &as_map(json!({}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter("ip_address".to_owned())
        );
        assert_eq!(err.to_string(), "Missing required parameter: ip_address");
    }

    #[test]
    fn extra_and_unknown_keys_never_fail() {
        let action = firewall_block_action();
        let params = as_map(json!({
            "ip_address": "10.0.0.1",
            "unknown_key": [1, 2, 3],
            "another": {"nested": true}
        }));
        assert!(validate(&action, &params).is_ok());
    }

    #[test]
    fn type_and_enum_deviations_are_advisory_only() {
        let action = firewall_block_action();
        let params = as_map(json!({
            "ip_address": 42,
            "duration_minutes": "sixty",
            "mode": "tarpit"
        }));
        assert!(validate(&action, &params).is_ok());
        let notes = advisory_mismatches(&action, &params);
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn conforming_values_produce_no_advisories() {
        let action = firewall_block_action();
        let params = as_map(json!({
            "ip_address": "10.0.0.1",
            "duration_minutes": 15,
            "mode": "drop"
        }));
        assert!(validate(&action, &params).is_ok());
        assert!(advisory_mismatches(&action, &params).is_empty());
    }
}
