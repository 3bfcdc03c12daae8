// ABOUTME: Server entrypoint: config from env, sqlite storage, axum serve
// ABOUTME: CLI overrides for port, database URL, and log verbosity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mimic Simulator Contributors

//! # Mimic MCP Server binary
//!
//! ```bash
//! # Start with environment configuration
//! cargo run --bin mimic-mcp-server
//!
//! # Override the port and database
//! cargo run --bin mimic-mcp-server -- --port 9191 --database-url sqlite:./data/mimic.db
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use mimic_mcp_server::config::ServerConfig;
use mimic_mcp_server::fabricator;
use mimic_mcp_server::logging;
use mimic_mcp_server::mcp::resources::ServerResources;
use mimic_mcp_server::mcp::server::SimulatorMcpServer;
use mimic_mcp_server::storage::{SharedStorage, SqliteStorage};

#[derive(Parser)]
#[command(
    name = "mimic-mcp-server",
    about = "Mimic MCP Server - vendor product simulator",
    long_about = "Serves simulated vendor product APIs behind the MCP protocol"
)]
struct Args {
    /// Listen port override (defaults to MCP_SERVER_PORT or 9090)
    #[arg(long)]
    port: Option<u16>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(if args.verbose { "debug" } else { "info" });

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    let config = Arc::new(config);

    let storage: SharedStorage = Arc::new(SqliteStorage::connect(&config.database_url).await?);
    let fabricator = fabricator::from_config(&config.fabricator)?;
    let resources = Arc::new(ServerResources::new(storage, fabricator, config.clone()));

    info!("Starting Mimic MCP Server on port {}", config.http_port);
    info!(
        "Product endpoints: http://{}:{}/<Category>/<Product>?token=<token>",
        config.host, config.http_port
    );

    SimulatorMcpServer::new(resources).run().await?;
    Ok(())
}
