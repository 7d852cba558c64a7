//! Basic SDK usage example.
//!
//! Connects to a Tessera server, lists its tools, creates an assessment and
//! answers one UI action the way a host application would.
//!
//! Run with: cargo run --example basic_usage

use serde_json::json;
use std::time::Duration;
use tessera_sdk::{ActionEvent, Conversation, Outcome, TesseraClient, TesseraResult};

#[tokio::main]
async fn main() -> TesseraResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let client = TesseraClient::builder()
        .base_url("http://localhost:8080")
        .timeout(Duration::from_secs(10))
        .build()?;

    if !client.connect().await {
        println!("Server unreachable; is `tessera` running on port 8080?");
        return Ok(());
    }

    println!("Available tools:");
    for tool in client.available_tools().await {
        println!("  {}: {}", tool.name, tool.description);
    }

    // Direct tool call
    match client
        .call_tool("generate_report", json!({"format": "json"}))
        .await?
    {
        Outcome::Success(result) => {
            println!("\n{}", result.content.unwrap_or_default());
            if let Some(resource) = result.ui_resource {
                println!("UI resource: {} ({})", resource.uri, resource.mime_type);
            }
        }
        Outcome::Failure(failure) => println!("\nServer said: {}", failure.error),
    }

    // Conversation with a UI action coming back from the rendered form
    let mut conversation = Conversation::new(client);
    let reply = conversation.send_message("Start a maturity assessment").await;
    println!("\nassistant> {}", reply.content);

    let reply = conversation
        .handle_action(ActionEvent::new(
            "submit_assessment",
            json!({"assessmentId": 1, "averageScore": "3.2", "scores": [3, 4, 2, 4, 3, 3]}),
        ))
        .await;
    println!("\nassistant> {}", reply.content);

    Ok(())
}
