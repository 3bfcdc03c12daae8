// ABOUTME: Access control gate tests: error precedence and grant resolution
// ABOUTME: Covers InvalidToken > ProductNotFound > AccessDenied ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use mimic_mcp_server::access::{AccessError, AccessGate};
use mimic_mcp_server::storage::StorageProvider;

mod common;
use common::{harness, settle};

#[tokio::test]
async fn invalid_token_takes_precedence_over_missing_product() {
    let h = harness().await;
    let gate = AccessGate::new(h.resources.storage.clone());

    // Both the token and the product are unknown; the token error wins
    let err = gate
        .authorize("no-such-token", "NoSuch", "Product")
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::InvalidToken));
}

#[tokio::test]
async fn empty_token_is_invalid() {
    let h = harness().await;
    let gate = AccessGate::new(h.resources.storage.clone());

    let err = gate
        .authorize("", "Firewall", "USGFirewall")
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::InvalidToken));
}

#[tokio::test]
async fn disabled_token_is_invalid() {
    let h = harness().await;
    h.storage.disable_token(&h.token.token);
    let gate = AccessGate::new(h.resources.storage.clone());

    let err = gate
        .authorize(&h.token.token, "Firewall", "USGFirewall")
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::InvalidToken));
}

#[tokio::test]
async fn valid_token_with_unknown_product_is_not_found() {
    let h = harness().await;
    let gate = AccessGate::new(h.resources.storage.clone());

    let err = gate
        .authorize(&h.token.token, "NoSuch", "Product")
        .await
        .unwrap_err();
    match err {
        AccessError::ProductNotFound(path) => assert_eq!(path, "NoSuch/Product"),
        other => panic!("expected ProductNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn granted_product_but_ungranted_token_is_denied() {
    let h = harness().await;
    // A second token with no grants at all
    let ungranted = h
        .resources
        .storage
        .create_token("ungranted", 2, "tok-ungranted")
        .await
        .unwrap();
    let gate = AccessGate::new(h.resources.storage.clone());

    let err = gate
        .authorize(&ungranted.token, "Firewall", "USGFirewall")
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::AccessDenied));
}

#[tokio::test]
async fn authorized_call_resolves_product_and_touches_token() {
    let h = harness().await;
    let gate = AccessGate::new(h.resources.storage.clone());

    let auth = gate
        .authorize(&h.token.token, "Firewall", "USGFirewall")
        .await
        .unwrap();
    assert_eq!(auth.product.path(), "Firewall/USGFirewall");
    assert_eq!(auth.token.name, "test-token");
    assert!(auth.token.last_used.is_none());

    // last-used is recorded by a detached task
    settle().await;
    let refreshed = h
        .resources
        .storage
        .lookup_token(&h.token.token)
        .await
        .unwrap()
        .unwrap();
    assert!(refreshed.last_used.is_some());
}
