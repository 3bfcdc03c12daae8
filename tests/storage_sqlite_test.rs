// ABOUTME: SQLite storage backend tests over a temporary database file
// ABOUTME: Covers schema bootstrap, lookups, grants, touches, and audits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use mimic_core::AuditRecord;
use mimic_mcp_server::storage::{SqliteStorage, StorageProvider};
use serde_json::json;

mod common;
use common::firewall_descriptor;

async fn temp_storage() -> (tempfile::TempDir, SqliteStorage) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("test.db").display());
    let storage = SqliteStorage::connect(&url).await.unwrap();
    (dir, storage)
}

#[tokio::test]
async fn health_check_succeeds_on_fresh_database() {
    let (_dir, storage) = temp_storage().await;
    storage.health_check().await.unwrap();
}

#[tokio::test]
async fn product_round_trip_preserves_action_schema() {
    let (_dir, storage) = temp_storage().await;
    let id = storage.create_product(&firewall_descriptor()).await.unwrap();
    assert!(id > 0);

    let loaded = storage
        .lookup_product("Firewall", "USGFirewall")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.display_name, "USG Firewall");
    assert_eq!(loaded.actions.len(), 2);
    let block = loaded.find_action("block_ip_address").unwrap();
    assert_eq!(block.parameters[0].key, "ip_address");
    assert!(block.parameters[0].required);

    assert!(storage
        .lookup_product("Firewall", "NoSuch")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn reseeding_a_product_updates_in_place() {
    let (_dir, storage) = temp_storage().await;
    let first = storage.create_product(&firewall_descriptor()).await.unwrap();

    let mut updated = firewall_descriptor();
    updated.description = "updated description".to_owned();
    let second = storage.create_product(&updated).await.unwrap();
    assert_eq!(first, second);

    let loaded = storage
        .lookup_product("Firewall", "USGFirewall")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.description, "updated description");
}

#[tokio::test]
async fn token_lifecycle_and_grants() {
    let (_dir, storage) = temp_storage().await;
    let product_id = storage.create_product(&firewall_descriptor()).await.unwrap();
    let token = storage.create_token("ops", 1, "tok-sqlite").await.unwrap();

    // No grant yet
    assert!(storage
        .list_granted_products("tok-sqlite")
        .await
        .unwrap()
        .is_empty());

    storage.grant_product(token.id, product_id).await.unwrap();
    // Granting twice is a no-op
    storage.grant_product(token.id, product_id).await.unwrap();

    let granted = storage.list_granted_products("tok-sqlite").await.unwrap();
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0].id, product_id);

    let loaded = storage.lookup_token("tok-sqlite").await.unwrap().unwrap();
    assert_eq!(loaded.name, "ops");
    assert!(loaded.last_used.is_none());

    storage.touch_token(loaded.id).await.unwrap();
    let touched = storage.lookup_token("tok-sqlite").await.unwrap().unwrap();
    assert!(touched.last_used.is_some());

    assert!(storage.lookup_token("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn audit_records_append_without_error() {
    let (_dir, storage) = temp_storage().await;
    let record = AuditRecord::new(
        "Firewall".to_owned(),
        "USGFirewall".to_owned(),
        "block_ip_address".to_owned(),
        json!({"ip_address": "10.0.0.1"}),
        json!({"success": true}),
        true,
    )
    .with_token(1, "ops".to_owned())
    .with_source_ip("192.0.2.1".to_owned());

    storage.append_audit_record(&record).await.unwrap();
}
