//! Configuration types for the Tessera SDK.

use crate::error::TesseraError;
use std::time::Duration;
use url::Url;

/// Default path of the protocol endpoint on a Tessera server.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/mcp-server";

/// Configuration for the Tessera client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Tessera server. Not needed for in-process transports.
    pub base_url: Option<Url>,
    /// Path of the protocol endpoint, relative to `base_url`.
    pub endpoint_path: String,
    /// Deadline for a single attempt.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }
}

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffStrategy {
    /// `attempt * initial_backoff`
    Linear,
    /// `initial_backoff * multiplier^(attempt - 1)`
    Exponential { multiplier: f64 },
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff growth.
    pub strategy: BackoffStrategy,
    /// HTTP status codes to retry on when the body is not an envelope.
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(10),
            strategy: BackoffStrategy::Linear,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration before retry number `attempt` (1-based).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let backoff = match self.strategy {
            BackoffStrategy::Linear => self.initial_backoff.saturating_mul(attempt),
            BackoffStrategy::Exponential { multiplier } => {
                let backoff_ms = self.initial_backoff.as_millis() as f64
                    * multiplier.powi(attempt as i32 - 1);
                Duration::from_millis(backoff_ms as u64)
            }
        };
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }

    /// Check if an error should trigger a retry.
    pub fn should_retry(&self, error: &TesseraError) -> bool {
        match error {
            TesseraError::Api { status, .. } => self.should_retry_status(*status),
            other => other.is_retryable(),
        }
    }
}
