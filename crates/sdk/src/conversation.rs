//! Chat session that routes user input to tools and keeps the message history.

use crate::bridge::{ActionBridge, BridgeResponse};
use crate::client::TesseraClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tessera_core::{build, ActionEvent, Component, ResourceUri, UiResourceConfig};
use tessera_mcp::protocol::Outcome;
use tracing::{error, warn};

const WELCOME: &str = "Hello and welcome. Get started with your Product Content Automation Strategy by exploring the sample prompts, or ask a question below.";

const HELP: &str = "I can help you explore your Product Content Automation Strategy. Ask me for an assessment, a report, the assessment dimensions, or a step by step optimization guide.";

const REQUEST_APOLOGY: &str =
    "Sorry, there was an error processing your request. Please try again.";

pub const SAMPLE_PROMPTS: &[&str] = &[
    "Quick start with an assessment of current Product Content Automation Strategy",
    "Guide through a step by step process to optimize my Product Content Automation Strategy",
    "Show me a report of my analytics",
    "Which dimensions does the assessment cover?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_prompts: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
enum Intent {
    Tool {
        name: &'static str,
        arguments: serde_json::Value,
    },
    Export,
    WorkflowGuide,
    ExternalResource,
    Help,
}

fn route_intent(text: &str) -> Intent {
    let text = text.to_lowercase();
    // "export the assessment" and "which dimensions does the assessment cover"
    // both mention an assessment, so the narrower intents go first.
    if text.contains("export") {
        Intent::Export
    } else if text.contains("dimension") {
        Intent::Tool {
            name: "list_dimensions",
            arguments: json!({}),
        }
    } else if text.contains("assessment") {
        Intent::Tool {
            name: "create_assessment",
            arguments: json!({"type": "maturity"}),
        }
    } else if text.contains("report") {
        Intent::Tool {
            name: "generate_report",
            arguments: json!({"format": "html"}),
        }
    } else if text.contains("step by step") || text.contains("guide") {
        Intent::WorkflowGuide
    } else if text.contains("mcp") || text.contains("ui resource") {
        Intent::ExternalResource
    } else {
        Intent::Help
    }
}

/// Externally hosted form, shown through the `text/uri-list` resource path.
fn external_form() -> Component {
    Component::resource(build(
        UiResourceConfig::url(
            "ui://example/interactive-form",
            "https://example.com/interactive-form",
        )
        .title("Interactive Assessment Form")
        .initial_data(json!({"theme": "light", "mode": "assessment"})),
    ))
}

fn workflow_guide() -> Component {
    let steps = [
        "Current State Assessment",
        "Gap Analysis",
        "Strategy Development",
        "Implementation Planning",
        "Monitoring & Optimization",
    ];
    Component::native(
        "workflow-guide",
        json!({
            "title": "Product Content Automation Strategy Optimization",
            "steps": steps
                .iter()
                .enumerate()
                .map(|(i, name)| json!({"id": i + 1, "name": name, "status": "pending"}))
                .collect::<Vec<_>>(),
        }),
    )
}

/// A conversation between a user and the tool server.
pub struct Conversation {
    client: TesseraClient,
    bridge: ActionBridge,
    messages: Vec<Message>,
    current_component: Option<Component>,
    next_id: u64,
}

impl Conversation {
    pub fn new(client: TesseraClient) -> Self {
        let mut conversation = Self {
            bridge: ActionBridge::with_client(client.clone()),
            client,
            messages: Vec::new(),
            current_component: None,
            next_id: 1,
        };
        let welcome = conversation.push(Role::Assistant, WELCOME.to_string(), None);
        conversation.messages[welcome].sample_prompts =
            SAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect();
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Component shown next to the conversation, if any.
    pub fn current_component(&self) -> Option<&Component> {
        self.current_component.as_ref()
    }

    /// Append the user's text and the assistant's reply; returns the reply.
    pub async fn send_message(&mut self, text: &str) -> &Message {
        self.push(Role::User, text.to_string(), None);

        let response = match route_intent(text) {
            Intent::Tool { name, arguments } => self.run_tool(name, arguments).await,
            Intent::Export => self.export_current_report().await,
            Intent::WorkflowGuide => BridgeResponse {
                content: "Here is a step by step process to optimize your Product Content Automation Strategy.".to_string(),
                component: Some(workflow_guide()),
            },
            Intent::ExternalResource => BridgeResponse {
                content: "Here is an interactive UI resource rendered from an external page."
                    .to_string(),
                component: Some(external_form()),
            },
            Intent::Help => BridgeResponse::text(HELP),
        };

        self.reply(response)
    }

    /// Record an action emitted by a rendered component and the bridge's reply.
    pub async fn handle_action(&mut self, event: ActionEvent) -> &Message {
        self.push(Role::User, format!("UI Action: {}", event.tool), None);
        let response = self.bridge.handle(event).await;
        self.reply(response)
    }

    async fn run_tool(&self, name: &str, arguments: serde_json::Value) -> BridgeResponse {
        match self.client.call_tool(name, arguments).await {
            Ok(Outcome::Success(result)) => BridgeResponse {
                content: result
                    .content
                    .unwrap_or_else(|| "Tool executed successfully".to_string()),
                component: result.ui_resource.map(Component::resource),
            },
            Ok(Outcome::Failure(failure)) => {
                warn!(tool = %name, error = %failure.error, "Tool call rejected");
                BridgeResponse::text(REQUEST_APOLOGY)
            }
            Err(err) => {
                error!(tool = %name, error = %err, "Tool call failed");
                BridgeResponse::text(REQUEST_APOLOGY)
            }
        }
    }

    async fn export_current_report(&self) -> BridgeResponse {
        let report_id = self
            .current_component
            .as_ref()
            .and_then(Component::ui_resource)
            .and_then(|r| r.uri.parse::<ResourceUri>().ok())
            .filter(|uri| uri.kind == "report")
            .map(|uri| uri.id);

        match report_id {
            Some(id) => {
                self.run_tool("export_data", json!({"type": "report", "id": id}))
                    .await
            }
            None => BridgeResponse::text("Generate a report first, then ask me to export it."),
        }
    }

    fn reply(&mut self, response: BridgeResponse) -> &Message {
        if let Some(component) = &response.component {
            self.current_component = Some(component.clone());
        }
        let index = self.push(Role::Assistant, response.content, response.component);
        &self.messages[index]
    }

    fn push(&mut self, role: Role, content: String, component: Option<Component>) -> usize {
        self.messages.push(Message {
            id: self.next_id,
            role,
            content,
            component,
            sample_prompts: Vec::new(),
            timestamp: Utc::now(),
        });
        self.next_id += 1;
        self.messages.len() - 1
    }
}
