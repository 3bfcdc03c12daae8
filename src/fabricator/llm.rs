// ABOUTME: LLM-backed response fabricator over an OpenAI-compatible endpoint
// ABOUTME: Prompt construction, chat-completions call, and JSON extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use async_trait::async_trait;
use mimic_core::{ActionDefinition, ProductDescriptor};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{FabricatorError, ResponseFabricator};
use crate::config::FabricatorConfig;

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

const SYSTEM_PROMPT: &str =
    "You are an API response simulator. Reply with well-formed JSON and nothing else.";

/// Fabricator backed by an OpenAI-compatible chat-completions endpoint
pub struct LlmFabricator {
    client: Client,
    chat_url: Url,
    model: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl LlmFabricator {
    /// Build the HTTP client and resolve the completions URL.
    ///
    /// # Errors
    /// Returns [`FabricatorError::Upstream`] when the base URL or API key
    /// cannot form a usable client.
    pub fn new(config: &FabricatorConfig) -> Result<Self, FabricatorError> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| FabricatorError::Upstream(format!("bad base URL: {e}")))?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let chat_url = base
            .join(CHAT_COMPLETIONS_PATH)
            .map_err(|e| FabricatorError::Upstream(format!("bad completions URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = format!("Bearer {}", config.api_key.as_deref().unwrap_or_default());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| FabricatorError::Upstream(format!("invalid API key: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FabricatorError::Upstream(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            chat_url,
            model: config.model.clone(),
        })
    }

    fn build_prompt(
        product: &ProductDescriptor,
        action: &str,
        params: &Value,
        action_def: &ActionDefinition,
    ) -> String {
        let params_json =
            serde_json::to_string_pretty(params).unwrap_or_else(|_| "{}".to_owned());
        let action_desc = action_def.description.as_deref().unwrap_or_default();
        let mut prompt = format!(
            "You are the {} system. A client invoked the {action} operation \
             ({action_desc}) with these arguments:\n{params_json}\n\n",
            product.display_name
        );
        if let Some(notes) = &product.behavior_notes {
            prompt.push_str(&format!("Behavioral notes for this system: {notes}\n\n"));
        }
        prompt.push_str(
            "Produce a realistic API response for this operation as JSON. The response must:\n\
             1. Match the response format a real system of this kind would use\n\
             2. Contain plausible data\n\
             3. Reflect whether the operation succeeded or failed\n\n\
             Return the JSON only, with no surrounding text.",
        );
        prompt
    }

    /// Strip Markdown code fences some models wrap JSON replies in
    fn strip_fences(raw: &str) -> &str {
        let trimmed = raw.trim();
        let without_open = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .unwrap_or(trimmed);
        without_open
            .strip_suffix("```")
            .unwrap_or(without_open)
            .trim()
    }
}

#[async_trait]
impl ResponseFabricator for LlmFabricator {
    async fn fabricate(
        &self,
        product: &ProductDescriptor,
        action: &str,
        params: &Value,
        action_def: &ActionDefinition,
    ) -> Result<Value, FabricatorError> {
        let prompt = Self::build_prompt(product, action, params, action_def);
        debug!(product = %product.path(), action, "fabricating response via LLM");

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.7,
            "max_tokens": 1000
        });

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| FabricatorError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FabricatorError::Upstream(format!(
                "endpoint returned {status}: {detail}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| FabricatorError::Upstream(format!("unreadable completion: {e}")))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| FabricatorError::MalformedOutput("empty completion".to_owned()))?;

        serde_json::from_str(Self::strip_fences(content))
            .map_err(|e| FabricatorError::MalformedOutput(e.to_string()))
    }
}
