// ABOUTME: Axum server orchestration: router assembly, middleware, bind/serve
// ABOUTME: Merges health and simulator routes under trace and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use std::time::Duration;

use axum::http::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, Level};

use super::resources::ServerResources;
use super::sessions::SessionRegistry;
use crate::constants::protocol::SESSION_HEADER;
use crate::errors::{AppError, AppResult};
use crate::routes::{HealthRoutes, SimulatorRoutes};

/// The simulator's MCP server over HTTP
#[derive(Clone)]
pub struct SimulatorMcpServer {
    resources: Arc<ServerResources>,
}

impl SimulatorMcpServer {
    /// Create a server with pre-built resources (dependency injection)
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Get a shared reference to the server resources
    #[must_use]
    pub fn resources(&self) -> Arc<ServerResources> {
        self.resources.clone()
    }

    /// Run the HTTP server on the configured host and port.
    ///
    /// # Errors
    /// Returns an error when the listener cannot bind or the server fails.
    pub async fn run(&self) -> AppResult<()> {
        SessionRegistry::spawn_sweeper(
            self.resources.sessions.clone(),
            self.resources.config.session.sweep_interval,
        );

        let app = Self::router(&self.resources);

        let host = &self.resources.config.host;
        let port = self.resources.config.http_port;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], port)));
        info!("HTTP server listening on http://{addr}");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

        Ok(())
    }

    /// Assemble the complete router with middleware layers.
    ///
    /// Layers are applied bottom-up: CORS wraps tracing wraps the request
    /// deadline wraps the routes.
    #[must_use]
    pub fn router(resources: &Arc<ServerResources>) -> Router {
        // A stalled fabricator cannot hold a worker past this deadline;
        // the dispatch path's own timeout fires well before it.
        let request_deadline =
            resources.config.fabricator.timeout + Duration::from_secs(30);

        Router::new()
            .merge(HealthRoutes::routes(Arc::clone(resources)))
            .merge(SimulatorRoutes::routes(Arc::clone(resources)))
            .fallback(SimulatorRoutes::invalid_path)
            .layer(TimeoutLayer::new(request_deadline))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
            .layer(Self::cors_layer())
    }

    /// CORS: open to all origins, mirroring the reference deployment
    fn cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                CONTENT_TYPE,
                ACCEPT,
                AUTHORIZATION,
                HeaderName::from_static(SESSION_HEADER),
            ])
            .expose_headers([HeaderName::from_static(SESSION_HEADER)])
    }
}
