// Wire protocol: method requests and the normalized response envelope

use crate::error::{ErrorCode, McpError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tessera_core::resource::UiResource;

pub const METHOD_LIST_TOOLS: &str = "tools/list";
pub const METHOD_CALL_TOOL: &str = "tools/call";
pub const METHOD_READ_RESOURCE: &str = "resources/read";

/// Request as it arrives on the wire: `{ method, params? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl WireRequest {
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// A validated request, one variant per method.
#[derive(Debug, Clone, PartialEq)]
pub enum McpRequest {
    ListTools,
    CallTool(CallToolParams),
    ReadResource(ReadResourceParams),
}

impl McpRequest {
    pub fn call_tool(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self::CallTool(CallToolParams {
            name: name.into(),
            arguments,
        })
    }

    pub fn read_resource(uri: impl Into<String>) -> Self {
        Self::ReadResource(ReadResourceParams { uri: uri.into() })
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::ListTools => METHOD_LIST_TOOLS,
            Self::CallTool(_) => METHOD_CALL_TOOL,
            Self::ReadResource(_) => METHOD_READ_RESOURCE,
        }
    }

    pub fn into_wire(self) -> WireRequest {
        let params = match &self {
            Self::ListTools => None,
            Self::CallTool(params) => Some(serde_json::json!({
                "name": params.name,
                "arguments": params.arguments,
            })),
            Self::ReadResource(params) => Some(serde_json::json!({ "uri": params.uri })),
        };
        WireRequest::new(self.method(), params)
    }
}

impl TryFrom<WireRequest> for McpRequest {
    type Error = McpError;

    fn try_from(request: WireRequest) -> Result<Self, Self::Error> {
        match request.method.as_str() {
            METHOD_LIST_TOOLS => Ok(Self::ListTools),
            METHOD_CALL_TOOL => {
                let params = request
                    .params
                    .ok_or_else(|| McpError::validation("tools/call requires params.name"))?;
                let params: CallToolParams = serde_json::from_value(params)
                    .map_err(|e| McpError::validation(format!("tools/call: {}", e)))?;

                if params.name.trim().is_empty() {
                    return Err(McpError::validation("tools/call requires params.name"));
                }
                if !params.arguments.is_object() {
                    return Err(McpError::validation(
                        "tools/call params.arguments must be an object",
                    ));
                }
                Ok(Self::CallTool(params))
            }
            METHOD_READ_RESOURCE => {
                let params = request
                    .params
                    .ok_or_else(|| McpError::validation("resources/read requires params.uri"))?;
                let params: ReadResourceParams = serde_json::from_value(params)
                    .map_err(|e| McpError::validation(format!("resources/read: {}", e)))?;

                if params.uri.trim().is_empty() {
                    return Err(McpError::validation("resources/read requires params.uri"));
                }
                Ok(Self::ReadResource(params))
            }
            other => Err(McpError::UnknownMethod(other.to_string())),
        }
    }
}

/// Tool definition as listed by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// List tools response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolSchema>,
}

/// Call tool request params
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default = "empty_object", deserialize_with = "null_as_empty_object")]
    pub arguments: serde_json::Value,
}

/// Read resource request params
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

fn null_as_empty_object<'de, D>(deserializer: D) -> Result<serde_json::Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(if value.is_null() { empty_object() } else { value })
}

/// Result of `tools/call`: text content, a UI resource, and any structured
/// records the tool wants to hand back (`assessment`, `report`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_resource: Option<UiResource>,
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl CallToolResult {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_ui_resource(mut self, resource: UiResource) -> Self {
        self.ui_resource = Some(resource);
        self
    }

    /// Attach a structured record under `key`.
    pub fn with_data(
        mut self,
        key: impl Into<String>,
        value: &impl Serialize,
    ) -> serde_json::Result<Self> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Read back a structured record.
    pub fn data_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn has_payload(&self) -> bool {
        self.content.is_some() || self.ui_resource.is_some()
    }
}

/// Normalized response: `{ success, result? , error?, code? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl Envelope {
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            code: None,
        }
    }

    pub fn failure(error: &McpError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
            code: Some(error.code()),
        }
    }

    /// HTTP status this envelope should travel with.
    pub fn http_status(&self) -> u16 {
        match (self.success, self.code) {
            (true, _) => 200,
            (false, Some(code)) => code.http_status(),
            (false, None) => 500,
        }
    }

    /// Decode the payload of a successful envelope.
    ///
    /// Errors only when the envelope claims success but its result does not
    /// have the expected shape.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Outcome<T>, serde_json::Error> {
        if !self.success {
            return Ok(Outcome::Failure(Failure {
                error: self
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
                code: self.code,
            }));
        }

        let result = self.result.unwrap_or(serde_json::Value::Null);
        Ok(Outcome::Success(serde_json::from_value(result)?))
    }
}

/// A failure reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub error: String,
    pub code: Option<ErrorCode>,
}

/// Decoded envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// Outcome of a tool call as seen by a client.
pub type ToolResult = Outcome<CallToolResult>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: serde_json::Value) -> WireRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_list_tools() {
        let request = McpRequest::try_from(wire(json!({"method": "tools/list"}))).unwrap();
        assert_eq!(request, McpRequest::ListTools);
    }

    #[test]
    fn test_parse_call_tool_defaults_arguments() {
        let request = McpRequest::try_from(wire(json!({
            "method": "tools/call",
            "params": {"name": "list_dimensions"}
        })))
        .unwrap();
        assert_eq!(request, McpRequest::call_tool("list_dimensions", json!({})));

        let request = McpRequest::try_from(wire(json!({
            "method": "tools/call",
            "params": {"name": "list_dimensions", "arguments": null}
        })))
        .unwrap();
        assert_eq!(request, McpRequest::call_tool("list_dimensions", json!({})));
    }

    #[test]
    fn test_parse_call_tool_requires_name() {
        let err = McpRequest::try_from(wire(json!({"method": "tools/call"}))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);

        let err = McpRequest::try_from(wire(json!({
            "method": "tools/call",
            "params": {"name": "  "}
        })))
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);

        let err = McpRequest::try_from(wire(json!({
            "method": "tools/call",
            "params": {"name": "x", "arguments": [1, 2]}
        })))
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn test_parse_read_resource_requires_uri() {
        let err = McpRequest::try_from(wire(json!({
            "method": "resources/read",
            "params": {}
        })))
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);

        let request = McpRequest::try_from(wire(json!({
            "method": "resources/read",
            "params": {"uri": "ui://report/1"}
        })))
        .unwrap();
        assert_eq!(request, McpRequest::read_resource("ui://report/1"));
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = McpRequest::try_from(wire(json!({"method": "tools/delete"}))).unwrap_err();
        assert_eq!(err, McpError::UnknownMethod("tools/delete".into()));
    }

    #[test]
    fn test_into_wire_matches_parse() {
        let request = McpRequest::call_tool("create_assessment", json!({"type": "maturity"}));
        let wire = request.clone().into_wire();
        assert_eq!(wire.method, "tools/call");
        assert_eq!(McpRequest::try_from(wire).unwrap(), request);

        let wire = McpRequest::ListTools.into_wire();
        assert_eq!(serde_json::to_value(&wire).unwrap(), json!({"method": "tools/list"}));
    }

    #[test]
    fn test_call_tool_result_flattens_data() {
        let result = CallToolResult::text("done")
            .with_data("dimensions", &vec!["a", "b"])
            .unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"content": "done", "dimensions": ["a", "b"]}));

        let parsed: CallToolResult = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.data_as::<Vec<String>>("dimensions").unwrap(), vec!["a", "b"]);
        assert!(parsed.ui_resource.is_none());
    }

    #[test]
    fn test_envelope_failure_decode() {
        let envelope = Envelope::failure(&McpError::UnknownTool("unknown_tool".into()));
        assert_eq!(envelope.http_status(), 400);

        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["success"], false);
        assert_eq!(wire["code"], "UnknownTool");
        assert!(wire.get("result").is_none());

        let outcome: ToolResult = envelope.decode().unwrap();
        let failure = outcome.failure().unwrap();
        assert!(failure.error.contains("unknown_tool"));
        assert_eq!(failure.code, Some(ErrorCode::UnknownTool));
    }

    #[test]
    fn test_envelope_failure_without_message() {
        let envelope: Envelope = serde_json::from_value(json!({"success": false})).unwrap();
        let outcome: ToolResult = envelope.decode().unwrap();
        assert_eq!(outcome.failure().unwrap().error, "Unknown error");
    }

    #[test]
    fn test_envelope_malformed_success() {
        let envelope = Envelope::success(json!({"tools": "not-a-list"}));
        assert!(envelope.decode::<ListToolsResult>().is_err());
    }
}
