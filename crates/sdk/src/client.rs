//! Main client for the Tessera SDK.

use crate::config::{ClientConfig, RetryConfig};
use crate::error::{TesseraError, TesseraResult};
use crate::transport::{HttpTransport, LocalTransport, Transport};
use std::sync::Arc;
use std::time::Duration;
use tessera_core::resource::Resource;
use tessera_mcp::protocol::{
    CallToolResult, Envelope, ListToolsResult, McpRequest, Outcome, ToolResult, ToolSchema,
    WireRequest,
};
use tessera_mcp::McpServer;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

#[derive(Debug, Default)]
struct ConnectionState {
    connected: bool,
    tools: Vec<ToolSchema>,
}

/// Client for a Tessera protocol server.
#[derive(Clone)]
pub struct TesseraClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<ConnectionState>>,
}

impl TesseraClient {
    /// Create a new client builder.
    pub fn builder() -> TesseraClientBuilder {
        TesseraClientBuilder::new()
    }

    /// Client talking to a server in the same process.
    pub fn local(server: McpServer) -> Self {
        Self::with_transport(ClientConfig::default(), Arc::new(LocalTransport::new(server)))
    }

    /// Create a client over an explicit transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            state: Arc::new(RwLock::new(ConnectionState::default())),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the tool list and mark the client connected.
    ///
    /// Returns false on any failure; the client stays usable and `connect`
    /// may be called again.
    pub async fn connect(&self) -> bool {
        match self.fetch_tools().await {
            Ok(tools) => {
                info!(tools = tools.len(), "Connected to protocol server");
                let mut state = self.state.write().await;
                state.connected = true;
                state.tools = tools;
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to connect to protocol server");
                self.state.write().await.connected = false;
                false
            }
        }
    }

    /// List the server's tools, or an empty list when the server is unreachable.
    pub async fn list_tools(&self) -> Vec<ToolSchema> {
        match self.fetch_tools().await {
            Ok(tools) => {
                self.state.write().await.tools = tools.clone();
                tools
            }
            Err(err) => {
                warn!(error = %err, "Failed to list tools");
                Vec::new()
            }
        }
    }

    /// Invoke a tool, retrying transient failures.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> TesseraResult<ToolResult> {
        self.call_tool_with_cancel(name, arguments, &CancellationToken::new())
            .await
    }

    /// Invoke a tool; cancelling `cancel` aborts the call, including any
    /// pending backoff, and is never retried.
    pub async fn call_tool_with_cancel(
        &self,
        name: &str,
        arguments: serde_json::Value,
        cancel: &CancellationToken,
    ) -> TesseraResult<ToolResult> {
        let request = McpRequest::call_tool(name, arguments).into_wire();
        let retry: &RetryConfig = &self.config.retry_config;
        let mut attempt: u32 = 0;

        loop {
            let result = self
                .send_once(&request, cancel)
                .await
                .and_then(decode::<CallToolResult>);

            match result {
                Ok(outcome) => {
                    if let Outcome::Failure(failure) = &outcome {
                        debug!(tool = %name, error = %failure.error, "Tool call returned failure");
                    }
                    return Ok(outcome);
                }
                Err(err) if attempt < retry.max_retries && retry.should_retry(&err) => {
                    attempt += 1;
                    let backoff = retry.backoff_for_attempt(attempt);
                    warn!(
                        tool = %name,
                        attempt,
                        max_retries = retry.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Tool call failed, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(TesseraError::Cancelled),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
                Err(err) => {
                    error!(tool = %name, attempts = attempt + 1, error = %err, "Tool call failed");
                    return Err(err);
                }
            }
        }
    }

    /// Read a resource. One attempt, bounded by the configured timeout.
    pub async fn get_resource(&self, uri: &str) -> TesseraResult<Resource> {
        let request = McpRequest::read_resource(uri).into_wire();
        let envelope = self.send_once(&request, &CancellationToken::new()).await?;
        match decode::<Resource>(envelope)? {
            Outcome::Success(resource) => Ok(resource),
            Outcome::Failure(failure) => Err(TesseraError::Protocol(failure)),
        }
    }

    /// Whether the last `connect` succeeded.
    pub async fn is_connected(&self) -> bool {
        self.state.read().await.connected
    }

    /// Tools seen by the last successful `connect` or `list_tools`.
    pub async fn available_tools(&self) -> Vec<ToolSchema> {
        self.state.read().await.tools.clone()
    }

    pub async fn has_tool(&self, name: &str) -> bool {
        self.state.read().await.tools.iter().any(|t| t.name == name)
    }

    async fn fetch_tools(&self) -> TesseraResult<Vec<ToolSchema>> {
        let envelope = self
            .send_once(&McpRequest::ListTools.into_wire(), &CancellationToken::new())
            .await?;
        match decode::<ListToolsResult>(envelope)? {
            Outcome::Success(result) => Ok(result.tools),
            Outcome::Failure(failure) => Err(TesseraError::Protocol(failure)),
        }
    }

    async fn send_once(
        &self,
        request: &WireRequest,
        cancel: &CancellationToken,
    ) -> TesseraResult<Envelope> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TesseraError::Cancelled),
            result = tokio::time::timeout(self.config.timeout, self.transport.send(request)) => {
                result.unwrap_or(Err(TesseraError::Timeout))
            }
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(envelope: Envelope) -> TesseraResult<Outcome<T>> {
    envelope
        .decode()
        .map_err(|e| TesseraError::MalformedEnvelope(e.to_string()))
}

/// Builder for creating a TesseraClient.
pub struct TesseraClientBuilder {
    base_url: Option<String>,
    endpoint_path: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl TesseraClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            endpoint_path: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
            transport: None,
        }
    }

    /// Set the base URL of the Tessera server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the endpoint path (default `/api/mcp-server`).
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Use a custom transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> TesseraResult<TesseraClient> {
        let base_url = self.base_url.as_deref().map(Url::parse).transpose()?;

        let mut config = ClientConfig {
            base_url,
            timeout: self.timeout,
            retry_config: self.retry_config,
            ..Default::default()
        };
        if let Some(path) = self.endpoint_path {
            config.endpoint_path = path;
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(Arc::new(config.clone()))?),
        };

        Ok(TesseraClient::with_transport(config, transport))
    }
}

impl Default for TesseraClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
