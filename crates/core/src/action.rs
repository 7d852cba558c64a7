use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message type tag rendered content uses when posting an action to the host.
pub const UI_ACTION_MESSAGE_TYPE: &str = "mcp-ui-action";

/// A user-triggered action emitted by rendered UI content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub tool: String,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl ActionEvent {
    pub fn new(tool: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            tool: tool.into(),
            params,
            timestamp: Utc::now(),
        }
    }

    /// Decode a message posted by rendered content.
    ///
    /// Accepts `{ "type": "mcp-ui-action", "tool": ..., "params": ... }` and
    /// ignores anything else the frame may post.
    pub fn from_ui_message(message: &serde_json::Value) -> Option<Self> {
        if message.get("type")?.as_str()? != UI_ACTION_MESSAGE_TYPE {
            return None;
        }

        let tool = message.get("tool")?.as_str()?;
        if tool.is_empty() {
            return None;
        }

        let params = message
            .get("params")
            .cloned()
            .filter(|p| !p.is_null())
            .unwrap_or_else(empty_params);

        Some(Self::new(tool, params))
    }

    /// Look up a parameter by key.
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }
}
