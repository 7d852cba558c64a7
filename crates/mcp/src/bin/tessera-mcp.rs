// Standalone MCP server binary (newline-delimited JSON over stdio)

use anyhow::Result;
use std::sync::Arc;
use tessera_core::IdGenerator;
use tessera_mcp::server::McpServer;
use tessera_mcp::tools::default_registry;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Tessera MCP Server starting...");

    let registry = default_registry(Arc::new(IdGenerator::new()))?;
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}
