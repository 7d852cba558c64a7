//! HTTP transport layer for the Tessera SDK.

use super::Transport;
use crate::config::ClientConfig;
use crate::error::{TesseraError, TesseraResult};
use reqwest::Client;
use std::sync::Arc;
use tessera_mcp::protocol::{Envelope, WireRequest};
use tracing::debug;
use url::Url;

/// HTTP transport posting requests to a Tessera server endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> TesseraResult<Self> {
        let base_url = config
            .base_url
            .as_ref()
            .ok_or_else(|| TesseraError::Config("base_url is required".to_string()))?;
        let endpoint = base_url.join(&config.endpoint_path)?;

        // No reqwest timeout: the client bounds each attempt with `config.timeout`.
        let client = Client::builder().build()?;

        Ok(Self { client, endpoint })
    }

    /// URL every request is posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &WireRequest) -> TesseraResult<Envelope> {
        debug!(url = %self.endpoint, method = %request.method, "POST request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Failure envelopes travel with 4xx/5xx statuses; the body decides.
        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => Err(TesseraError::MalformedEnvelope(e.to_string())),
            Err(_) => Err(TesseraError::from_response(status.as_u16(), &body)),
        }
    }
}
