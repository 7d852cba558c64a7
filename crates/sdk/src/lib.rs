//! # Tessera SDK
//!
//! Rust client for Tessera tool servers: call tools, read UI resources and
//! feed actions from rendered resources back into a conversation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tessera_sdk::{TesseraClient, TesseraResult};
//!
//! #[tokio::main]
//! async fn main() -> TesseraResult<()> {
//!     let client = TesseraClient::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     if client.connect().await {
//!         let outcome = client
//!             .call_tool("create_assessment", serde_json::json!({"type": "maturity"}))
//!             .await?;
//!         if let Some(result) = outcome.success() {
//!             println!("{}", result.content.unwrap_or_default());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## UI actions
//!
//! ```rust,no_run
//! use tessera_sdk::bridge::{action_channel, ActionBridge};
//!
//! # async fn example(client: tessera_sdk::TesseraClient) {
//! let (sender, receiver) = action_channel(32);
//! let (responses_tx, mut responses) = tokio::sync::mpsc::channel(32);
//! tokio::spawn(ActionBridge::with_client(client).run(receiver, responses_tx));
//!
//! // hand `sender` to the renderer; it posts messages from resource frames
//! sender
//!     .post_message(&serde_json::json!({
//!         "type": "mcp-ui-action",
//!         "tool": "refresh_report",
//!         "params": {"reportId": 7}
//!     }))
//!     .await;
//!
//! if let Some(reply) = responses.recv().await {
//!     println!("{}", reply.content);
//! }
//! # }
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod transport;

pub use bridge::{action_channel, ActionBridge, BridgeResponse};
pub use client::{TesseraClient, TesseraClientBuilder};
pub use config::{BackoffStrategy, ClientConfig, RetryConfig};
pub use conversation::{Conversation, Message, Role};
pub use error::{TesseraError, TesseraResult};

// Re-export protocol and domain types for convenience
pub use tessera_core::{ActionEvent, Component, Resource, UiResource};
pub use tessera_mcp::protocol::{CallToolResult, Failure, Outcome, ToolResult, ToolSchema};
pub use tessera_mcp::ErrorCode;
pub use tokio_util::sync::CancellationToken;
