// Protocol server: validates requests, dispatches to the registry and wraps
// every outcome in an envelope

use crate::error::McpError;
use crate::protocol::{
    CallToolParams, CallToolResult, Envelope, ListToolsResult, McpRequest, WireRequest,
};
use crate::tools::markup::escape_html;
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures::{FutureExt, SinkExt, StreamExt};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tessera_core::resource::{Resource, MIME_HTML};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

/// Longest request line accepted on the stdio transport.
const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_registry(Arc::new(registry))
    }

    pub fn with_registry(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one request. Never fails: errors come back as failure envelopes.
    pub async fn handle(&self, request: WireRequest) -> Envelope {
        let started = Instant::now();
        let method = request.method.clone();

        let outcome = match McpRequest::try_from(request) {
            Ok(request) => self.route(request).await,
            Err(err) => Err(err),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(result) => {
                tracing::debug!(method = %method, elapsed_ms, "Request handled");
                Envelope::success(result)
            }
            Err(err) => {
                tracing::warn!(
                    method = %method,
                    code = ?err.code(),
                    elapsed_ms,
                    error = %err,
                    "Request failed"
                );
                Envelope::failure(&err)
            }
        }
    }

    /// Handle a raw JSON body.
    pub async fn handle_value(&self, body: serde_json::Value) -> Envelope {
        match serde_json::from_value::<WireRequest>(body) {
            Ok(request) => self.handle(request).await,
            Err(e) => malformed(e),
        }
    }

    /// Handle an undecoded request body.
    pub async fn handle_bytes(&self, body: &[u8]) -> Envelope {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(body) => self.handle_value(body).await,
            Err(e) => malformed(e),
        }
    }

    async fn route(&self, request: McpRequest) -> Result<serde_json::Value, McpError> {
        let method = request.method();
        match request {
            McpRequest::ListTools => encode(
                method,
                &ListToolsResult {
                    tools: self.registry.list(),
                },
            ),
            McpRequest::CallTool(params) => {
                let result = self.call_tool(params).await?;
                encode(method, &result)
            }
            McpRequest::ReadResource(params) => encode(method, &read_resource(&params.uri)),
        }
    }

    async fn call_tool(&self, params: CallToolParams) -> Result<CallToolResult, McpError> {
        let CallToolParams { name, arguments } = params;
        tracing::info!(tool = %name, "Calling tool");

        let dispatched = AssertUnwindSafe(self.registry.dispatch(&name, arguments))
            .catch_unwind()
            .await;

        let mut result = match dispatched {
            Ok(result) => result?,
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                tracing::error!(tool = %name, detail = %detail, "Tool handler panicked");
                return Err(McpError::handler_fault(&name, "handler panicked"));
            }
        };

        if !result.has_payload() {
            result.content = Some(format!("Tool {} executed successfully", name));
        }
        Ok(result)
    }

    /// Serve newline-delimited JSON: one request per line in, one envelope per line out.
    pub async fn serve_stdio<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut requests = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let mut responses = FramedWrite::new(writer, LinesCodec::new());

        while let Some(line) = requests.next().await {
            let envelope = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_bytes(line.as_bytes()).await,
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    Envelope::failure(&McpError::validation("Request line too long"))
                }
                Err(LinesCodecError::Io(e)) => {
                    return Err(e).context("Failed to read request");
                }
            };

            let line = serde_json::to_string(&envelope).context("Failed to encode response")?;
            responses
                .send(line)
                .await
                .context("Failed to write response")?;
        }

        tracing::info!("Input closed, stopping");
        Ok(())
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        tracing::info!(tools = self.registry.len(), "MCP server listening on stdio");
        self.serve_stdio(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

fn malformed(error: serde_json::Error) -> Envelope {
    Envelope::failure(&McpError::validation(format!("Malformed request: {}", error)))
}

fn encode(method: &str, value: &impl Serialize) -> Result<serde_json::Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::encode(method, e.to_string()))
}

/// Resource reads are synthesized; the server keeps no resource store.
fn read_resource(uri: &str) -> Resource {
    Resource {
        uri: uri.to_string(),
        mime_type: MIME_HTML.to_string(),
        text: format!("<div>Resource content for {}</div>", escape_html(uri)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::protocol::{ListToolsResult, ToolResult, ToolSchema};
    use crate::tools::{default_registry, json_schema_object, Tool};
    use serde_json::json;
    use std::collections::HashSet;
    use tessera_core::IdGenerator;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    struct SilentTool;

    #[async_trait::async_trait]
    impl Tool for SilentTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "silent".to_string(),
                description: "Returns nothing to show".to_string(),
                input_schema: json_schema_object(json!({}), vec![]),
            }
        }

        async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
            Ok(CallToolResult::default())
        }
    }

    struct PanickingTool;

    #[async_trait::async_trait]
    impl Tool for PanickingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "panicking".to_string(),
                description: "Panics".to_string(),
                input_schema: json_schema_object(json!({}), vec![]),
            }
        }

        async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
            panic!("secret internal state")
        }
    }

    fn server() -> McpServer {
        let mut registry = default_registry(Arc::new(IdGenerator::new())).unwrap();
        registry.register(Arc::new(SilentTool)).unwrap();
        registry.register(Arc::new(PanickingTool)).unwrap();
        McpServer::new(registry)
    }

    fn call(name: &str, arguments: serde_json::Value) -> WireRequest {
        McpRequest::call_tool(name, arguments).into_wire()
    }

    #[tokio::test]
    async fn test_list_tools_matches_registry() {
        let server = server();
        let envelope = server.handle(McpRequest::ListTools.into_wire()).await;
        assert!(envelope.success);

        let listed: ListToolsResult = envelope.decode().unwrap().success().unwrap();
        let names: HashSet<_> = listed.tools.iter().map(|t| t.name.clone()).collect();
        let registered: HashSet<_> = server.registry().list().into_iter().map(|t| t.name).collect();

        assert_eq!(names.len(), listed.tools.len());
        assert_eq!(names, registered);
        assert!(names.contains("create_assessment"));
        assert!(listed.tools.iter().all(|t| t.input_schema["type"] == "object"));
    }

    #[tokio::test]
    async fn test_create_assessment_scenario() {
        let envelope = server()
            .handle(call("create_assessment", json!({"type": "maturity"})))
            .await;
        assert!(envelope.success);

        let result: ToolResult = envelope.decode().unwrap();
        let result = result.success().unwrap();
        let resource = result.ui_resource.unwrap();
        assert!(resource.uri.starts_with("ui://assessment/"));
        assert!(resource.uri["ui://assessment/".len()..].parse::<u64>().is_ok());
        assert_eq!(resource.mime_type, "text/html");
    }

    #[tokio::test]
    async fn test_unknown_tool_scenario() {
        let envelope = server().handle(call("unknown_tool", json!({}))).await;
        assert!(!envelope.success);
        assert!(envelope.error.as_deref().unwrap().contains("unknown_tool"));
        assert_eq!(envelope.code, Some(ErrorCode::UnknownTool));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let envelope = server()
            .handle(WireRequest::new("tools/delete", None))
            .await;
        assert!(!envelope.success);
        assert_eq!(envelope.code, Some(ErrorCode::UnknownMethod));
        assert!(!envelope.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_params_is_validation() {
        let envelope = server()
            .handle(WireRequest::new("tools/call", None))
            .await;
        assert_eq!(envelope.code, Some(ErrorCode::Validation));
        assert_eq!(envelope.http_status(), 400);
    }

    #[tokio::test]
    async fn test_empty_result_gets_content() {
        let envelope = server().handle(call("silent", json!({}))).await;
        let result = envelope.decode::<CallToolResult>().unwrap().success().unwrap();
        assert_eq!(result.content.as_deref(), Some("Tool silent executed successfully"));
    }

    #[tokio::test]
    async fn test_every_successful_call_has_payload() {
        let server = server();
        let calls = [
            ("create_assessment", json!({})),
            ("generate_report", json!({"format": "json"})),
            ("list_dimensions", json!({})),
            ("export_data", json!({"type": "report", "id": 1})),
            ("silent", json!({})),
        ];
        for (name, arguments) in calls {
            let envelope = server.handle(call(name, arguments)).await;
            let result = envelope.decode::<CallToolResult>().unwrap().success().unwrap();
            assert!(result.has_payload(), "{} returned no payload", name);
        }
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_fault() {
        let envelope = server().handle(call("panicking", json!({}))).await;
        assert!(!envelope.success);
        assert_eq!(envelope.code, Some(ErrorCode::HandlerFault));
        assert_eq!(envelope.http_status(), 500);
        assert!(!envelope.error.unwrap().contains("secret internal state"));
    }

    #[test]
    fn test_encode_failure_names_the_method() {
        // Tuple keys are not valid JSON object keys.
        let mut unencodable = std::collections::BTreeMap::new();
        unencodable.insert((1u8, 2u8), "value");

        let err = encode("tools/list", &unencodable).unwrap_err();
        assert_eq!(err.code(), ErrorCode::HandlerFault);
        assert!(matches!(err, McpError::Encode { ref method, .. } if method == "tools/list"));
        assert!(err.to_string().starts_with("Failed to encode tools/list result: "));
        assert!(!err.to_string().contains("Tool tools/list"));
    }

    #[tokio::test]
    async fn test_read_resource_is_synthesized() {
        let envelope = server()
            .handle(McpRequest::read_resource("ui://report/5").into_wire())
            .await;
        let resource: Resource = envelope.decode().unwrap().success().unwrap();
        assert_eq!(resource.uri, "ui://report/5");
        assert_eq!(resource.mime_type, "text/html");
        assert!(resource.text.contains("ui://report/5"));
    }

    #[tokio::test]
    async fn test_handle_value_rejects_malformed_body() {
        let envelope = server().handle_value(json!({"params": {}})).await;
        assert_eq!(envelope.code, Some(ErrorCode::Validation));
    }

    #[tokio::test]
    async fn test_serve_stdio_answers_each_line() {
        let server = server();
        let (client, server_io) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_io);

        let task = tokio::spawn(async move { server.serve_stdio(server_read, server_write).await });

        let (client_read, mut client_write) = tokio::io::split(client);
        client_write
            .write_all(b"{\"method\":\"tools/list\"}\n\nnot json\n{\"method\":\"nope\"}\n")
            .await
            .unwrap();
        client_write.shutdown().await.unwrap();

        let mut lines = BufReader::new(client_read).lines();
        let mut envelopes = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            envelopes.push(serde_json::from_str::<Envelope>(&line).unwrap());
        }

        task.await.unwrap().unwrap();
        assert_eq!(envelopes.len(), 3);
        assert!(envelopes[0].success);
        assert_eq!(envelopes[1].code, Some(ErrorCode::Validation));
        assert_eq!(envelopes[2].code, Some(ErrorCode::UnknownMethod));
    }
}
