//! Turns actions emitted by rendered UI resources into conversation replies.

use crate::client::TesseraClient;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tessera_core::{ActionEvent, Component};
use tessera_mcp::protocol::Outcome;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const ACTION_APOLOGY: &str =
    "Sorry, there was an error processing your action. Please try again.";

/// What the host appends to the conversation after an action.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeResponse {
    pub content: String,
    pub component: Option<Component>,
}

impl BridgeResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            component: None,
        }
    }
}

/// Handles action events; optionally forwards them to a protocol server.
#[derive(Clone, Default)]
pub struct ActionBridge {
    client: Option<TesseraClient>,
}

impl ActionBridge {
    /// Bridge that only synthesizes replies locally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bridge that may forward actions naming a server tool as follow-up calls.
    pub fn with_client(client: TesseraClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Synthesize a reply without contacting the server. Never fails.
    pub fn on_action(&self, event: &ActionEvent) -> BridgeResponse {
        let content = match event.tool.as_str() {
            "submit_assessment" => submit_assessment(event),
            "refresh_report" => refresh_report(event),
            "export_report" => export_report(event),
            "button_click" => button_click(event),
            _ => fallback(event),
        };
        BridgeResponse::text(content)
    }

    /// Reply to an action, forwarding it to the server when it names a known tool.
    pub async fn handle(&self, event: ActionEvent) -> BridgeResponse {
        if let Some(client) = &self.client {
            if client.has_tool(&event.tool).await {
                return follow_up(client, event).await;
            }
        }
        self.on_action(&event)
    }

    /// Consume events until every sender is dropped or `responses` closes.
    pub async fn run(self, mut events: ActionReceiver, responses: mpsc::Sender<BridgeResponse>) {
        while let Some(event) = events.recv().await {
            debug!(tool = %event.tool, "Handling UI action");
            let response = self.handle(event).await;
            if responses.send(response).await.is_err() {
                debug!("Response receiver dropped, stopping action bridge");
                break;
            }
        }
    }
}

async fn follow_up(client: &TesseraClient, event: ActionEvent) -> BridgeResponse {
    let arguments = if event.params.is_object() {
        event.params
    } else {
        Value::Object(Default::default())
    };

    match client.call_tool(&event.tool, arguments).await {
        Ok(Outcome::Success(result)) => BridgeResponse {
            content: result
                .content
                .unwrap_or_else(|| format!("{} completed.", event.tool)),
            component: result.ui_resource.map(Component::resource),
        },
        Ok(Outcome::Failure(failure)) => {
            warn!(tool = %event.tool, error = %failure.error, "Follow-up tool call rejected");
            BridgeResponse::text(ACTION_APOLOGY)
        }
        Err(err) => {
            warn!(tool = %event.tool, error = %err, "Follow-up tool call failed");
            BridgeResponse::text(ACTION_APOLOGY)
        }
    }
}

/// Sending half handed to whatever renders UI resources.
#[derive(Debug, Clone)]
pub struct ActionSender {
    tx: mpsc::Sender<ActionEvent>,
}

impl ActionSender {
    /// Queue an event. Returns false once the bridge is gone.
    pub async fn emit(&self, event: ActionEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Queue a raw message posted by rendered content. Returns false when the
    /// message is not an action or the bridge is gone.
    pub async fn post_message(&self, message: &Value) -> bool {
        match ActionEvent::from_ui_message(message) {
            Some(event) => self.emit(event).await,
            None => false,
        }
    }
}

/// Receiving half consumed by [`ActionBridge::run`].
#[derive(Debug)]
pub struct ActionReceiver {
    rx: mpsc::Receiver<ActionEvent>,
}

impl ActionReceiver {
    pub async fn recv(&mut self) -> Option<ActionEvent> {
        self.rx.recv().await
    }
}

/// Bounded channel carrying action events from renderers to the bridge.
pub fn action_channel(capacity: usize) -> (ActionSender, ActionReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (ActionSender { tx }, ActionReceiver { rx })
}

fn param_text(event: &ActionEvent, key: &str) -> Option<String> {
    match event.param(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn display_time(event: &ActionEvent) -> String {
    let at = event
        .param("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(event.timestamp);
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn submit_assessment(event: &ActionEvent) -> String {
    let mut lines = vec!["Assessment submitted.".to_string(), String::new()];

    if let Some(id) = param_text(event, "assessmentId") {
        lines.push(format!("Assessment ID: {}", id));
    }
    if let Some(kind) = param_text(event, "type") {
        lines.push(format!("Type: {}", kind));
    }
    if let Some(average) = param_text(event, "averageScore") {
        lines.push(format!("Average score: {}/5", average));
    }
    lines.push(format!("Submitted: {}", display_time(event)));

    if let Some(scores) = event.param("scores").and_then(Value::as_array) {
        lines.push(String::new());
        lines.push("Scores:".to_string());
        for (i, score) in scores.iter().enumerate() {
            lines.push(format!("- Dimension {}: {}/5", i + 1, score));
        }
    }

    lines.push(String::new());
    lines.push(
        "Start with the lowest-scoring dimensions. Ask for a report to see how they affect your metrics."
            .to_string(),
    );
    lines.join("\n")
}

fn refresh_report(event: &ActionEvent) -> String {
    let id = param_text(event, "reportId").unwrap_or_else(|| "unknown".to_string());
    format!(
        "Report refreshed.\n\nReport ID: {}\nUpdated: {}\n\nThe dashboard now shows current values.",
        id,
        display_time(event)
    )
}

fn export_report(event: &ActionEvent) -> String {
    let id = param_text(event, "reportId").unwrap_or_else(|| "unknown".to_string());
    let mut lines = vec![
        "Report exported.".to_string(),
        String::new(),
        format!("Report ID: {}", id),
        format!("Exported: {}", display_time(event)),
    ];

    if let Some(metrics) = event.param("metrics").and_then(Value::as_object) {
        lines.push(String::new());
        lines.push("Metrics:".to_string());
        for (key, label) in [
            ("totalUsers", "Total users"),
            ("activeUsers", "Active users"),
            ("conversionRate", "Conversion rate"),
            ("revenue", "Revenue"),
        ] {
            if let Some(value) = metrics.get(key) {
                let value = value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                lines.push(format!("- {}: {}", label, value));
            }
        }
    }
    lines.join("\n")
}

fn button_click(event: &ActionEvent) -> String {
    let id = param_text(event, "id")
        .or_else(|| param_text(event, "buttonId"))
        .unwrap_or_else(|| "Unknown Button".to_string());
    format!("Button clicked: {}", id)
}

fn fallback(event: &ActionEvent) -> String {
    let details = serde_json::to_string_pretty(&event.params).unwrap_or_else(|_| "{}".to_string());
    format!("UI action processed: {}\n\nAction details:\n{}", event.tool, details)
}
