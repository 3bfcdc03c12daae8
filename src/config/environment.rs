// ABOUTME: Environment-variable configuration loading for the server
// ABOUTME: Port/host, storage URL, fabricator endpoint, and session limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Server configuration, loaded exclusively from the environment.

use std::env;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Default listen port when `MCP_SERVER_PORT` is unset
const DEFAULT_PORT: u16 = 9090;
/// Default fabricator endpoint (OpenAI-compatible)
const DEFAULT_FABRICATOR_BASE_URL: &str = "https://api.openai.com/v1";
/// Default fabricator model
const DEFAULT_FABRICATOR_MODEL: &str = "gpt-4o-mini";
/// Default fabricator call deadline in seconds
const DEFAULT_FABRICATOR_TIMEOUT_SECS: u64 = 30;
/// Default idle session lifetime in seconds
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;
/// Default interval between session sweeps in seconds
const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen host (defaults to all interfaces)
    pub host: String,
    /// Listen port
    pub http_port: u16,
    /// Storage URL, e.g. `sqlite:data/mimic.db`
    pub database_url: String,
    /// Response fabricator settings
    pub fabricator: FabricatorConfig,
    /// Protocol session settings
    pub session: SessionConfig,
}

/// Settings for the generative response fabricator
#[derive(Debug, Clone)]
pub struct FabricatorConfig {
    /// API key; when absent the static template fabricator is used
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Hard deadline for one fabrication call
    pub timeout: Duration,
}

/// Settings for the ephemeral protocol session registry
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle lifetime before a session is evicted
    pub ttl: Duration,
    /// Interval between eviction sweeps
    pub sweep_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns a config error when a numeric variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_env_u64("MCP_SERVER_PORT", u64::from(DEFAULT_PORT))?;
        let http_port = u16::try_from(http_port)
            .map_err(|_| AppError::config(format!("MCP_SERVER_PORT out of range: {http_port}")))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_owned()),
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/mimic.db".to_owned()),
            fabricator: FabricatorConfig {
                api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                base_url: env::var("OPENAI_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_FABRICATOR_BASE_URL.to_owned()),
                model: env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_FABRICATOR_MODEL.to_owned()),
                timeout: Duration::from_secs(parse_env_u64(
                    "FABRICATOR_TIMEOUT_SECS",
                    DEFAULT_FABRICATOR_TIMEOUT_SECS,
                )?),
            },
            session: SessionConfig {
                ttl: Duration::from_secs(parse_env_u64(
                    "SESSION_TTL_SECS",
                    DEFAULT_SESSION_TTL_SECS,
                )?),
                sweep_interval: Duration::from_secs(parse_env_u64(
                    "SESSION_SWEEP_SECS",
                    DEFAULT_SESSION_SWEEP_SECS,
                )?),
            },
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SESSION_SWEEP_SECS),
        }
    }
}

fn parse_env_u64(var: &str, default: u64) -> AppResult<u64> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| AppError::config(format!("Invalid {var}={raw}: {e}"))),
        Err(_) => Ok(default),
    }
}
