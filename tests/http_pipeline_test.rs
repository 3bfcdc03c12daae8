// ABOUTME: HTTP boundary tests: path/token/body ordering, SSE framing, health
// ABOUTME: Exercises the full axum router over in-memory storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mimic_mcp_server::mcp::server::SimulatorMcpServer;
use mimic_mcp_server::storage::StorageProvider;

mod common;
use common::{harness, TestHarness};

fn app(h: &TestHarness) -> Router {
    SimulatorMcpServer::router(&h.resources)
}

fn rpc_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Unwrap a single SSE frame into its JSON payload
async fn sse_payload(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let data = text
        .strip_prefix("event: message\ndata: ")
        .unwrap()
        .strip_suffix("\n\n")
        .unwrap();
    serde_json::from_str(data).unwrap()
}

#[tokio::test]
async fn health_reports_healthy_storage() {
    let h = harness().await;
    let response = app(&h)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "mimic-mcp-server");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn get_without_token_is_unauthorized() {
    let h = harness().await;
    let response = app(&h)
        .oneshot(
            Request::builder()
                .uri("/Firewall/USGFirewall")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Token required");
}

#[tokio::test]
async fn get_with_unknown_token_is_unauthorized() {
    let h = harness().await;
    let response = app(&h)
        .oneshot(
            Request::builder()
                .uri("/Firewall/USGFirewall?token=bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_with_ungranted_token_is_forbidden() {
    let h = harness().await;
    h.resources
        .storage
        .create_token("ungranted", 2, "tok-ungranted")
        .await
        .unwrap();
    let response = app(&h)
        .oneshot(
            Request::builder()
                .uri("/Firewall/USGFirewall?token=tok-ungranted")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn get_unknown_product_is_not_found() {
    let h = harness().await;
    let uri = format!("/NoSuch/Product?token={}", h.token.token);
    let response = app(&h)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_returns_full_descriptor() {
    let h = harness().await;
    let uri = format!("/Firewall/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["category"], "Firewall");
    assert_eq!(body["name"], "USGFirewall");
    assert_eq!(body["display_name"], "USG Firewall");
    assert_eq!(body["actions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn post_without_json_content_type_is_rejected() {
    let h = harness().await;
    let uri = format!("/Firewall/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Content-Type must be application/json"
    );
}

#[tokio::test]
async fn post_with_malformed_body_is_rejected_before_auth() {
    let h = harness().await;
    // Deliberately bogus token: the body error must win
    let response = app(&h)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/Firewall/USGFirewall?token=bogus")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_with_wrong_rpc_version_is_rejected() {
    let h = harness().await;
    let uri = format!("/Firewall/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(rpc_request(
            &uri,
            &json!({"jsonrpc": "1.0", "method": "ping", "id": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_unknown_product_fails_before_rpc_processing() {
    let h = harness().await;
    let uri = format!("/NoSuch/Product?token={}", h.token.token);
    let response = app(&h)
        .oneshot(rpc_request(
            &uri,
            &json!({"jsonrpc": "2.0", "method": "tools/list", "id": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_initialize_frames_sse_and_mints_session_header() {
    let h = harness().await;
    let uri = format!("/Firewall/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(rpc_request(
            &uri,
            &json!({
                "jsonrpc": "2.0",
                "method": "initialize",
                "params": {"clientInfo": {"name": "pipeline-test"}},
                "id": 1
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    let session_id = response
        .headers()
        .get("mcp-session-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(h.resources.sessions.touch(&session_id));

    let payload = sse_payload(response).await;
    assert_eq!(payload["jsonrpc"], "2.0");
    assert_eq!(payload["id"], 1);
    assert!(payload["result"]["serverInfo"].is_object());
}

#[tokio::test]
async fn post_ping_echoes_id_within_sse_frame() {
    let h = harness().await;
    let uri = format!("/Firewall/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(rpc_request(
            &uri,
            &json!({"jsonrpc": "2.0", "method": "ping", "id": 42}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // ping never mints a session
    assert!(response.headers().get("mcp-session-id").is_none());
    let payload = sse_payload(response).await;
    assert_eq!(payload["id"], 42);
    assert_eq!(payload["result"], json!({}));
}

#[tokio::test]
async fn post_pure_notification_yields_accepted_with_no_body() {
    let h = harness().await;
    let uri = format!("/Firewall/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(rpc_request(
            &uri,
            &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn options_preflight_is_ok() {
    let h = harness().await;
    let response = app(&h)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/Firewall/USGFirewall")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn three_segment_path_is_a_structural_error() {
    let h = harness().await;
    let response = app(&h)
        .oneshot(
            Request::builder()
                .uri("/Firewall/USGFirewall/extra")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid path format. Expected: /Category/Product"
    );
}

#[tokio::test]
async fn malformed_slug_is_a_structural_error() {
    let h = harness().await;
    let uri = format!("/F/USGFirewall?token={}", h.token.token);
    let response = app(&h)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    // Single-character category fails the slug rules
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
