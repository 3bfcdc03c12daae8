// ABOUTME: Demo-data seeder loading a catalog of simulated products
// ABOUTME: Creates products, a demo capability token, and grants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! # Product Catalog Seeder
//!
//! Loads a demonstration catalog of simulated products into the store and
//! mints one capability token granted access to all of them.
//!
//! ```bash
//! cargo run --bin seed-products
//! cargo run --bin seed-products -- --database-url sqlite:./data/mimic.db
//! ```

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use mimic_core::ProductDescriptor;
use mimic_mcp_server::logging;
use mimic_mcp_server::storage::{SqliteStorage, StorageProvider};

#[derive(Parser)]
#[command(
    name = "seed-products",
    about = "Mimic MCP Server product catalog seeder",
    long_about = "Load demo product descriptors and mint a demo capability token"
)]
struct Args {
    /// Database URL (defaults to DATABASE_URL or sqlite:data/mimic.db)
    #[arg(long)]
    database_url: Option<String>,

    /// Label for the demo token
    #[arg(long, default_value = "demo")]
    token_name: String,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn descriptor(value: Value) -> anyhow::Result<ProductDescriptor> {
    let descriptor: ProductDescriptor = serde_json::from_value(value)?;
    descriptor.validate()?;
    Ok(descriptor)
}

// Long function: the catalog is one flat list of declarative definitions
fn demo_catalog() -> anyhow::Result<Vec<ProductDescriptor>> {
    let now = Utc::now();
    let stamp = |mut v: Value| -> Value {
        if let Some(map) = v.as_object_mut() {
            map.insert("id".to_owned(), json!(0));
            map.insert("created_at".to_owned(), json!(now));
            map.insert("updated_at".to_owned(), json!(now));
        }
        v
    };

    Ok(vec![
        descriptor(stamp(json!({
            "category": "Security",
            "name": "VirusTotal",
            "display_name": "VirusTotal Threat Intelligence",
            "description": "Virus and malware scanning service",
            "actions": [
                {
                    "name": "scan_file",
                    "display_name": "Scan file",
                    "description": "Upload a file for virus scanning",
                    "parameters": [
                        {"key": "file_path", "type": "String", "required": true, "description": "File path or URL"},
                        {"key": "scan_type", "type": "String", "required": false, "default": "full", "description": "Scan depth", "options": ["quick", "full", "deep"]}
                    ]
                },
                {
                    "name": "scan_url",
                    "display_name": "Scan URL",
                    "description": "Check whether a URL is malicious",
                    "parameters": [
                        {"key": "url", "type": "String", "required": true, "description": "URL to scan"}
                    ]
                },
                {
                    "name": "get_file_report",
                    "display_name": "Get file report",
                    "description": "Fetch a scan report by file hash",
                    "parameters": [
                        {"key": "hash", "type": "String", "required": true, "description": "MD5/SHA1/SHA256 hash"},
                        {"key": "verbose", "type": "Boolean", "required": false, "default": false, "description": "Include full detection detail"}
                    ]
                },
                {
                    "name": "scan_ip",
                    "display_name": "Analyze IP address",
                    "description": "Threat intelligence for an IP address",
                    "parameters": [
                        {"key": "ip", "type": "String", "required": true, "description": "IP address to analyze"}
                    ]
                }
            ]
        })))?,
        descriptor(stamp(json!({
            "category": "Firewall",
            "name": "USGFirewall",
            "display_name": "USG Firewall",
            "description": "Unified security gateway firewall management",
            "behavior_notes": "Block operations should return a rule identifier and the effective time window.",
            "actions": [
                {
                    "name": "check_firewall_health",
                    "display_name": "Check firewall health",
                    "description": "Report the firewall's operational status",
                    "parameters": []
                },
                {
                    "name": "block_ip_address",
                    "display_name": "Block IP address",
                    "description": "Add an IP address to the firewall deny list",
                    "parameters": [
                        {"key": "ip_address", "type": "String", "required": true, "description": "IP address to block, e.g. 192.168.1.100"},
                        {"key": "duration_minutes", "type": "Integer", "required": false, "default": 60, "description": "Block duration in minutes; 0 means permanent"},
                        {"key": "reason", "type": "String", "required": false, "description": "Reason for the block"}
                    ]
                },
                {
                    "name": "unblock_ip_address",
                    "display_name": "Unblock IP address",
                    "description": "Remove an IP address from the deny list",
                    "parameters": [
                        {"key": "ip_address", "type": "String", "required": true, "description": "IP address to unblock"}
                    ]
                },
                {
                    "name": "query_ip_block_status",
                    "display_name": "Query IP block status",
                    "description": "Report the block state of an IP address",
                    "parameters": [
                        {"key": "ip_address", "type": "String", "required": true, "description": "IP address to query"}
                    ]
                }
            ]
        })))?,
        descriptor(stamp(json!({
            "category": "IM",
            "name": "WeChat",
            "display_name": "WeChat Work",
            "description": "Enterprise instant messaging platform",
            "actions": [
                {
                    "name": "send_message",
                    "display_name": "Send text message",
                    "description": "Send a text message to a user or group",
                    "parameters": [
                        {"key": "to", "type": "String", "required": true, "description": "Recipient user or group id"},
                        {"key": "content", "type": "String", "required": true, "description": "Message body"}
                    ]
                },
                {
                    "name": "create_group",
                    "display_name": "Create group chat",
                    "description": "Create a group chat with initial members",
                    "parameters": [
                        {"key": "name", "type": "String", "required": true, "description": "Group name"},
                        {"key": "members", "type": "Array", "required": false, "description": "Initial member user ids"}
                    ]
                },
                {
                    "name": "get_user_info",
                    "display_name": "Get user info",
                    "description": "Look up a user's profile",
                    "parameters": [
                        {"key": "user_id", "type": "String", "required": true, "description": "User id"}
                    ]
                }
            ]
        })))?,
        descriptor(stamp(json!({
            "category": "Ticket",
            "name": "Jira",
            "display_name": "Jira Ticketing",
            "description": "Issue and ticket tracking system",
            "actions": [
                {
                    "name": "create_ticket",
                    "display_name": "Create ticket",
                    "description": "Open a new ticket",
                    "parameters": [
                        {"key": "title", "type": "String", "required": true, "description": "Ticket title"},
                        {"key": "description", "type": "String", "required": false, "description": "Ticket body"},
                        {"key": "priority", "type": "String", "required": false, "default": "medium", "description": "Ticket priority", "options": ["low", "medium", "high", "critical"]}
                    ]
                },
                {
                    "name": "update_ticket_status",
                    "display_name": "Update ticket status",
                    "description": "Transition a ticket to a new status",
                    "parameters": [
                        {"key": "ticket_id", "type": "String", "required": true, "description": "Ticket identifier"},
                        {"key": "status", "type": "String", "required": true, "description": "New status", "options": ["open", "in_progress", "resolved", "closed"]}
                    ]
                },
                {
                    "name": "add_comment",
                    "display_name": "Add comment",
                    "description": "Append a comment to a ticket",
                    "parameters": [
                        {"key": "ticket_id", "type": "String", "required": true, "description": "Ticket identifier"},
                        {"key": "comment", "type": "String", "required": true, "description": "Comment text"}
                    ]
                }
            ]
        })))?,
        descriptor(stamp(json!({
            "category": "NetworkDevice",
            "name": "CiscoSwitch",
            "display_name": "Cisco Catalyst Switch",
            "description": "Managed network switch",
            "actions": [
                {
                    "name": "get_status",
                    "display_name": "Get device status",
                    "description": "Report uptime, load, and port summary",
                    "parameters": []
                },
                {
                    "name": "execute_command",
                    "display_name": "Execute CLI command",
                    "description": "Run an IOS command and return its output",
                    "parameters": [
                        {"key": "command", "type": "String", "required": true, "description": "IOS command line"}
                    ]
                },
                {
                    "name": "configure_vlan",
                    "display_name": "Configure VLAN",
                    "description": "Create or update a VLAN",
                    "parameters": [
                        {"key": "vlan_id", "type": "Integer", "required": true, "description": "VLAN number (1-4094)"},
                        {"key": "name", "type": "String", "required": false, "description": "VLAN name"}
                    ]
                }
            ]
        })))?,
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(if args.verbose { "debug" } else { "info" });

    let database_url = args.database_url.unwrap_or_else(|| {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/mimic.db".to_owned())
    });
    let storage = Arc::new(SqliteStorage::connect(&database_url).await?);

    let token_string = Uuid::new_v4().to_string();
    let token = storage.create_token(&args.token_name, 1, &token_string).await?;

    let mut seeded = 0usize;
    for product in demo_catalog()? {
        let product_id = storage.create_product(&product).await?;
        storage.grant_product(token.id, product_id).await?;
        info!("Seeded {}/{}", product.category, product.name);
        seeded += 1;
    }

    info!("Seeded {seeded} products");
    info!("Demo token ({}): {token_string}", args.token_name);
    info!("Try: curl 'http://localhost:9090/Firewall/USGFirewall?token={token_string}'");
    Ok(())
}
