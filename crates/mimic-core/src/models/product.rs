// ABOUTME: Declarative product schema: descriptors, actions, and parameters
// ABOUTME: Includes slug validation and the tagged parameter type variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Shortest accepted category/name slug
const SLUG_MIN_LEN: usize = 2;
/// Longest accepted category/name slug
const SLUG_MAX_LEN: usize = 50;

/// Validation errors for model construction
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A category or product name is not a URL-path-safe slug
    #[error("invalid slug {0:?}: expected 2-50 chars of [A-Za-z0-9_-]")]
    InvalidSlug(String),
    /// An action name is duplicated within one product
    #[error("duplicate action name {0:?} in product descriptor")]
    DuplicateAction(String),
    /// A parameter key is duplicated within one action
    #[error("duplicate parameter key {0:?} in action {1:?}")]
    DuplicateParameter(String, String),
}

/// Check that a category or product name is a URL-path-safe token.
///
/// Accepted: letters, digits, underscore, hyphen; 2-50 characters.
///
/// # Errors
/// Returns [`ModelError::InvalidSlug`] when the string falls outside that set.
pub fn validate_slug(slug: &str) -> Result<(), ModelError> {
    let len_ok = (SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&slug.len());
    let chars_ok = slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(ModelError::InvalidSlug(slug.to_owned()))
    }
}

/// Declared type of an action parameter.
///
/// Unknown type strings deserialize to [`ParameterType::String`], the safe
/// default, so descriptors authored with unexpected labels still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    /// Free-form text value
    String,
    /// Whole number value
    Integer,
    /// True/false value
    Boolean,
    /// Ordered list value
    Array,
    /// Nested object value
    Object,
}

impl ParameterType {
    /// Canonical label used on the wire and in stored descriptors
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Array => "Array",
            Self::Object => "Object",
        }
    }

    /// Parse a declared type label, case-insensitively, accepting the short
    /// aliases seen in descriptor templates (`Int`, `Bool`, `Number`).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "integer" | "int" | "number" => Self::Integer,
            "boolean" | "bool" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => Self::String,
        }
    }

    fn default_string() -> Self {
        Self::String
    }
}

impl Serialize for ParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        if label.is_empty() {
            return Err(de::Error::custom("parameter type label is empty"));
        }
        Ok(Self::from_label(&label))
    }
}

/// One parameter of an action definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Key the caller supplies in the argument map; unique within its action
    pub key: String,
    /// Declared value type
    #[serde(rename = "type", default = "ParameterType::default_string")]
    pub kind: ParameterType,
    /// Whether the key must be present in every call
    #[serde(default)]
    pub required: bool,
    /// Declared default; meaningless (and ignored) when `required` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Enumerated set of allowed values, if constrained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
    /// Human description of the parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One named operation a simulated product exposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Machine name, unique within the product (snake_case by convention)
    pub name: String,
    /// Human display name
    #[serde(default)]
    pub display_name: String,
    /// What the action does
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered parameter schema
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

impl ActionDefinition {
    /// Look up a parameter definition by key
    #[must_use]
    pub fn find_parameter(&self, key: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.key == key)
    }

    /// Keys of all required parameters, in declaration order
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.key.as_str())
    }
}

/// Declarative definition of one simulated product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// Storage identifier
    pub id: i64,
    /// Category slug, e.g. `Firewall`
    pub category: String,
    /// Product slug, unique within the category among enabled descriptors
    pub name: String,
    /// Human display name
    pub display_name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Advisory behavioral notes forwarded to the response fabricator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior_notes: Option<String>,
    /// Disabled descriptors are removed from dispatch without losing history
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Ordered list of actions this product exposes
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

const fn default_enabled() -> bool {
    true
}

impl ProductDescriptor {
    /// Look up an action definition by name
    #[must_use]
    pub fn find_action(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// `category/name` path form used in logs and audit records
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    /// Validate slugs and uniqueness invariants of this descriptor.
    ///
    /// # Errors
    /// Returns the first [`ModelError`] encountered: bad slug, duplicate
    /// action name, or duplicate parameter key within an action.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_slug(&self.category)?;
        validate_slug(&self.name)?;
        let mut seen_actions = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            if seen_actions.contains(&action.name.as_str()) {
                return Err(ModelError::DuplicateAction(action.name.clone()));
            }
            seen_actions.push(action.name.as_str());
            let mut seen_keys = Vec::with_capacity(action.parameters.len());
            for param in &action.parameters {
                if seen_keys.contains(&param.key.as_str()) {
                    return Err(ModelError::DuplicateParameter(
                        param.key.clone(),
                        action.name.clone(),
                    ));
                }
                seen_keys.push(param.key.as_str());
            }
        }
        Ok(())
    }
}
