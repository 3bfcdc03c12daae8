// ABOUTME: Response fabricator abstraction for simulated product output
// ABOUTME: Trait seam plus deadline wrapper; LLM and template backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Response fabricator.
//!
//! The dispatch engine consumes a single seam: `fabricate(product, action,
//! params, action_def) -> response`. Failures here are a normal, handled
//! outcome of `tools/call`, never a crash. The LLM backend is used when an
//! API key is configured; otherwise static templates stand in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mimic_core::{ActionDefinition, ProductDescriptor};
use serde_json::Value;

use crate::config::FabricatorConfig;
use crate::errors::{AppError, AppResult};

/// OpenAI-compatible generative backend
pub mod llm;

/// Static template backend
pub mod template;

pub use llm::LlmFabricator;
pub use template::TemplateFabricator;

/// Failure modes of a fabrication attempt
#[derive(Debug, thiserror::Error)]
pub enum FabricatorError {
    /// The call exceeded its deadline
    #[error("Fabricator timed out after {0:?}")]
    Timeout(Duration),
    /// The upstream endpoint failed or was unreachable
    #[error("Fabricator upstream failure: {0}")]
    Upstream(String),
    /// The generative output could not be parsed as JSON
    #[error("Fabricator produced malformed output: {0}")]
    MalformedOutput(String),
}

/// Synthesizes a plausible response payload for one action call
#[async_trait]
pub trait ResponseFabricator: Send + Sync {
    /// Produce a response object for the given call.
    ///
    /// # Errors
    /// Returns a [`FabricatorError`] on timeout, upstream failure, or
    /// unparseable output.
    async fn fabricate(
        &self,
        product: &ProductDescriptor,
        action: &str,
        params: &Value,
        action_def: &ActionDefinition,
    ) -> Result<Value, FabricatorError>;
}

/// Run a fabrication bounded by `deadline`.
///
/// # Errors
/// Returns [`FabricatorError::Timeout`] when the deadline elapses, or the
/// backend's own error otherwise.
pub async fn fabricate_with_deadline(
    fabricator: &dyn ResponseFabricator,
    product: &ProductDescriptor,
    action: &str,
    params: &Value,
    action_def: &ActionDefinition,
    deadline: Duration,
) -> Result<Value, FabricatorError> {
    match tokio::time::timeout(
        deadline,
        fabricator.fabricate(product, action, params, action_def),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(FabricatorError::Timeout(deadline)),
    }
}

/// Build the configured fabricator: LLM-backed when an API key is present,
/// static templates otherwise.
///
/// # Errors
/// Returns a config error when the LLM endpoint URL is unusable.
pub fn from_config(config: &FabricatorConfig) -> AppResult<Arc<dyn ResponseFabricator>> {
    if config.api_key.is_some() {
        let llm = LlmFabricator::new(config)
            .map_err(|e| AppError::config(format!("Fabricator setup failed: {e}")))?;
        Ok(Arc::new(llm))
    } else {
        tracing::info!("No fabricator API key configured; using static response templates");
        Ok(Arc::new(TemplateFabricator::new()))
    }
}
