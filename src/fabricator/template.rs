// ABOUTME: Static template fabricator used when no LLM endpoint is configured
// ABOUTME: Canned responses keyed by action-name substrings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use async_trait::async_trait;
use mimic_core::{ActionDefinition, ProductDescriptor};
use rand::Rng;
use serde_json::{json, Value};

use super::{FabricatorError, ResponseFabricator};

/// Deterministic-shape, randomized-content fallback fabricator
#[derive(Default)]
pub struct TemplateFabricator;

impl TemplateFabricator {
    /// Create the template fabricator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn canned_response(action: &str, params: &Value) -> Option<Value> {
        let mut rng = rand::thread_rng();
        let lowered = action.to_ascii_lowercase();

        if lowered.contains("send_message") {
            return Some(json!({
                "success": true,
                "message_id": format!("msg_{}", rng.gen_range(100_000..1_000_000)),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "status": "delivered"
            }));
        }
        if lowered.contains("check_ip") || lowered.contains("scan_ip") {
            let reputations = ["clean", "suspicious", "malicious"];
            let countries = ["US", "CN", "RU", "UK", "JP"];
            return Some(json!({
                "ip": params.get("ip").or_else(|| params.get("ip_address")).cloned().unwrap_or_else(|| json!("0.0.0.0")),
                "reputation": reputations[rng.gen_range(0..reputations.len())],
                "score": rng.gen_range(0..=100),
                "country": countries[rng.gen_range(0..countries.len())],
                "detections": rng.gen_range(0..=10)
            }));
        }
        if lowered.contains("create_ticket") {
            return Some(json!({
                "success": true,
                "ticket_id": format!("TICKET-{}", rng.gen_range(1000..10_000)),
                "status": "open",
                "priority": params.get("priority").cloned().unwrap_or_else(|| json!("medium")),
                "assigned_to": "system"
            }));
        }
        if lowered.contains("execute_command") {
            let command = params
                .get("command")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Some(json!({
                "success": true,
                "output": format!("Command executed: {command}"),
                "return_code": 0
            }));
        }
        if lowered.contains("get_status") {
            let states = ["online", "offline", "maintenance"];
            return Some(json!({
                "status": states[rng.gen_range(0..states.len())],
                "uptime": format!(
                    "{}d {}h {}m",
                    rng.gen_range(0..365),
                    rng.gen_range(0..24),
                    rng.gen_range(0..60)
                ),
                "connections": rng.gen_range(0..1000),
                "cpu_usage": format!("{}%", rng.gen_range(0..=100)),
                "memory_usage": format!("{}%", rng.gen_range(0..=100))
            }));
        }
        None
    }
}

#[async_trait]
impl ResponseFabricator for TemplateFabricator {
    async fn fabricate(
        &self,
        product: &ProductDescriptor,
        action: &str,
        params: &Value,
        _action_def: &ActionDefinition,
    ) -> Result<Value, FabricatorError> {
        if let Some(mut canned) = Self::canned_response(action, params) {
            if let Some(map) = canned.as_object_mut() {
                map.insert("app".to_owned(), json!(product.display_name));
                map.insert("action".to_owned(), json!(action));
            }
            return Ok(canned);
        }

        Ok(json!({
            "success": true,
            "app": product.display_name,
            "action": action,
            "data": params,
            "message": format!("Action {action} completed successfully")
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;

    fn product() -> ProductDescriptor {
        serde_json::from_value(json!({
            "id": 1,
            "category": "Firewall",
            "name": "USGFirewall",
            "display_name": "USG Firewall",
            "actions": [],
            "created_at": Utc::now(),
            "updated_at": Utc::now()
        }))
        .unwrap()
    }

    fn action(name: &str) -> ActionDefinition {
        serde_json::from_value(json!({"name": name, "display_name": name})).unwrap()
    }

    #[tokio::test]
    async fn template_matches_action_substrings() {
        let fab = TemplateFabricator::new();
        let response = fab
            .fabricate(
                &product(),
                "create_ticket",
                &json!({"priority": "high"}),
                &action("create_ticket"),
            )
            .await
            .unwrap();
        assert_eq!(response["status"], "open");
        assert_eq!(response["priority"], "high");
        assert_eq!(response["app"], "USG Firewall");
    }

    #[tokio::test]
    async fn unmatched_actions_get_generic_success() {
        let fab = TemplateFabricator::new();
        let response = fab
            .fabricate(
                &product(),
                "rotate_keys",
                &json!({"key_id": "k1"}),
                &action("rotate_keys"),
            )
            .await
            .unwrap();
        assert_eq!(response["success"], true);
        assert_eq!(response["action"], "rotate_keys");
        assert_eq!(response["data"]["key_id"], "k1");
    }
}
