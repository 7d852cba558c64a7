//! In-process transport.

use super::Transport;
use crate::error::TesseraResult;
use tessera_mcp::protocol::{Envelope, WireRequest};
use tessera_mcp::McpServer;

/// Sends requests straight to an [`McpServer`] in the same process.
#[derive(Clone)]
pub struct LocalTransport {
    server: McpServer,
}

impl LocalTransport {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }
}

#[async_trait::async_trait]
impl Transport for LocalTransport {
    async fn send(&self, request: &WireRequest) -> TesseraResult<Envelope> {
        Ok(self.server.handle(request.clone()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_core::IdGenerator;
    use tessera_mcp::protocol::{ListToolsResult, McpRequest};
    use tessera_mcp::ErrorCode;
    use tessera_mcp::tools::default_registry;

    fn transport() -> LocalTransport {
        let registry = default_registry(Arc::new(IdGenerator::new())).unwrap();
        LocalTransport::new(McpServer::new(registry))
    }

    #[tokio::test]
    async fn test_local_list_tools() {
        let envelope = transport()
            .send(&McpRequest::ListTools.into_wire())
            .await
            .unwrap();

        let tools: ListToolsResult = envelope.decode().unwrap().success().unwrap();
        assert_eq!(tools.tools.len(), 4);
    }

    #[tokio::test]
    async fn test_local_failure_is_an_envelope() {
        let envelope = transport()
            .send(&McpRequest::call_tool("nope", serde_json::json!({})).into_wire())
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.code, Some(ErrorCode::UnknownTool));
    }
}
