use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tessera_core::IdGenerator;
use tessera_mcp::tools::default_registry;
use tessera_mcp::McpServer;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Path the protocol endpoint is mounted on.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Answer cross-origin requests from any origin.
    #[serde(default = "default_cors")]
    pub permissive_cors: bool,
}

fn default_endpoint() -> String {
    "/api/mcp-server".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            permissive_cors: default_cors(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        if !config.http.endpoint.starts_with('/') {
            anyhow::bail!(
                "http.endpoint must start with '/', got {:?}",
                config.http.endpoint
            );
        }

        Ok(config)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub server: Arc<McpServer>,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let registry = default_registry(Arc::new(IdGenerator::new()))
            .context("Failed to build tool registry")?;
        tracing::info!(tools = registry.len(), "Tool registry ready");

        Ok(Self {
            server: Arc::new(McpServer::new(registry)),
        })
    }
}
