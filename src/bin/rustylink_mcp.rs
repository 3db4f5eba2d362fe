//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes Rusty Link's tools and resources over stdio. This mode is
//! designed for editor/agent integrations and shares all runtime configuration (including the
//! links file) with the HTTP binary.
use anyhow::{Context, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use rustylink::{
    config,
    logging::{self, ConsoleTarget},
    mcp::RustyLinkMcpServer,
    store::AliasStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing_with(ConsoleTarget::Stderr);

    let config = config::get_config();
    let base_url = config.base_url_for_port(config.server_port.unwrap_or(config::DEFAULT_PORT));
    let store = Arc::new(AliasStore::from_config(config, base_url));
    let server = RustyLinkMcpServer::new(store);

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
