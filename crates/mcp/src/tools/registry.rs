// Tool registry: named tool definitions and dispatch

use crate::error::McpError;
use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for `tools/list`
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    ///
    /// Returning an [`McpError`] (wrapped in `anyhow`) keeps its code; any other
    /// error is reported as a handler fault.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

/// Deserialize tool arguments, reporting failures as validation errors.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: serde_json::Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| {
        McpError::validation(format!("Invalid arguments for {}: {}", tool, e)).into()
    })
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let schema = tool.schema();
        if self.tools.contains_key(&schema.name) {
            anyhow::bail!("Tool {} is already registered", schema.name);
        }
        self.tools.insert(schema.name, tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool and wait for it to finish.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, McpError> {
        let tool = self
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        tool.execute(arguments).await.map_err(|err| {
            match err.downcast::<McpError>() {
                Ok(mcp) => mcp,
                Err(other) => McpError::handler_fault(name, format!("{:#}", other)),
            }
        })
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_string_enum(description: &str, values: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description,
        "enum": values
    })
}

pub fn json_schema_number(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_array(items: serde_json::Value, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde::Deserialize;
    use serde_json::json;

    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "Echo text back".to_string(),
                input_schema: json_schema_object(
                    json!({"text": json_schema_string("Text to echo")}),
                    vec!["text"],
                ),
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
            let args: EchoArgs = parse_arguments("echo", arguments)?;
            Ok(CallToolResult::text(args.text))
        }
    }

    struct FailingTool;

    #[async_trait::async_trait]
    impl Tool for FailingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "failing".to_string(),
                description: "Always fails".to_string(),
                input_schema: json_schema_object(json!({}), vec![]),
            }
        }

        async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
            tokio::task::yield_now().await;
            anyhow::bail!("disk on fire")
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();
        registry.register(Arc::new(FailingTool)).unwrap();
        registry
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry.register(Arc::new(EchoTool)).unwrap_err();
        assert!(err.to_string().contains("echo"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_is_sorted_and_unique() {
        let names: Vec<_> = registry().list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo", "failing"]);
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let result = registry()
            .dispatch("echo", json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(result.content.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let err = registry().dispatch("missing", json!({})).await.unwrap_err();
        assert_eq!(err, McpError::UnknownTool("missing".into()));
    }

    #[tokio::test]
    async fn test_dispatch_bad_arguments_is_validation() {
        let err = registry().dispatch("echo", json!({"text": 5})).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
        assert!(err.to_string().contains("echo"));
    }

    #[tokio::test]
    async fn test_dispatch_handler_error_is_fault() {
        let err = registry().dispatch("failing", json!({})).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::HandlerFault);
        assert!(err.to_string().contains("disk on fire"));
    }
}
