// ABOUTME: Unified error handling with standard error codes and HTTP responses
// ABOUTME: AppError carries an ErrorCode that maps onto HTTP status codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! Application-wide error type.
//!
//! Every fallible path in the server funnels into [`AppError`]; the HTTP
//! boundary converts it into a JSON error body via `IntoResponse` so
//! handlers can simply return `AppResult<T>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Result alias used throughout the server
pub type AppResult<T> = Result<T, AppError>;

/// Stable error classification, mapped onto HTTP statuses at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bearer credential absent, unknown, or disabled
    AuthInvalid,
    /// Credential valid but lacks a grant for the resource
    PermissionDenied,
    /// Referenced resource does not exist
    ResourceNotFound,
    /// Malformed or out-of-contract client input
    InvalidInput,
    /// Storage operation failed
    DatabaseError,
    /// Server configuration is unusable
    ConfigError,
    /// Upstream collaborator failed
    ExternalServiceError,
    /// Anything else; never leaks detail to the caller
    InternalError,
}

impl ErrorCode {
    /// HTTP status this code surfaces as
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::DatabaseError
            | Self::ConfigError
            | Self::ExternalServiceError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error: a code plus a human-readable message
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    /// Stable classification
    pub code: ErrorCode,
    /// Description logged and (for client errors) returned to the caller
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid or missing credential (401)
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Valid credential without the required grant (403)
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Missing resource (404)
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Malformed client input (400)
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Storage failure (500)
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unusable configuration (500)
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Upstream collaborator failure (500)
    #[must_use]
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message)
    }

    /// Unexpected failure (500)
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        // Internal detail stays in the logs; clients get a generic message
        let message = if status.is_server_error() {
            tracing::error!(code = ?self.code, "request failed: {}", self.message);
            "Internal server error".to_owned()
        } else {
            self.message
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_map_to_expected_statuses() {
        assert_eq!(
            AppError::auth_invalid("x").code.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::permission_denied("x").code.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("x").code.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid_input("x").code.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::database("x").code.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
