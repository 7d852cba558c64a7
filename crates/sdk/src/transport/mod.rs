//! Transport layer for the Tessera SDK.

pub mod http;
pub mod local;

pub use http::HttpTransport;
pub use local::LocalTransport;

use crate::error::TesseraResult;
use tessera_mcp::protocol::{Envelope, WireRequest};

/// Delivers one request to a server and returns its envelope.
///
/// A failure envelope is a successful send. Errors are reserved for requests
/// that never produced an envelope.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &WireRequest) -> TesseraResult<Envelope>;
}
