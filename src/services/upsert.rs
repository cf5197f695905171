//! Client for the index service's upsert endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::UpsertError;
use crate::models::{Batch, UpsertConfig, UpsertOutcome};
use crate::utils::retry::{RetryConfig, RetryResult, with_retry};

/// Optional response body of the upsert endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// One attempt at delivering a batch.
#[async_trait]
pub trait UpsertTransport: Send + Sync {
    /// Send `batch` once. `Ok(None)` means the service answered with an empty body.
    async fn send(&self, batch: &Batch) -> Result<Option<UpsertResponse>, UpsertError>;
}

/// JSON-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UpsertError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpsertError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UpsertTransport for HttpTransport {
    async fn send(&self, batch: &Batch) -> Result<Option<UpsertResponse>, UpsertError> {
        let response = self.client.post(&self.endpoint).json(batch).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpsertError::Protocol {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        parse_response_body(&body)
    }
}

/// Interpret a successful response body. Empty bodies are accepted as-is.
pub fn parse_response_body(body: &str) -> Result<Option<UpsertResponse>, UpsertError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| UpsertError::InvalidResponse(e.to_string()))?;

    // Only an object can carry a status; anything else is accepted without one
    let status = value
        .get("status")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string);
    Ok(Some(UpsertResponse { status }))
}

/// A failed upsert, after all attempts.
#[derive(Debug)]
pub struct UpsertFailure {
    pub error: UpsertError,
    pub attempts: u32,
}

/// Sends batches through a transport with bounded, immediate retries.
pub struct UpsertClient<T = HttpTransport> {
    transport: T,
    retry: RetryConfig,
}

impl UpsertClient<HttpTransport> {
    /// Create an HTTP client from the upsert configuration.
    pub fn from_config(config: &UpsertConfig) -> Result<Self, UpsertError> {
        let timeout = Duration::try_from_secs_f64(config.timeout_secs)
            .map_err(|e| UpsertError::Transport(format!("invalid timeout: {e}")))?;
        let transport = HttpTransport::new(config.endpoint.clone(), timeout)?;
        Ok(Self::new(transport, RetryConfig::new(config.retries)))
    }
}

impl<T: UpsertTransport> UpsertClient<T> {
    pub fn new(transport: T, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Deliver one batch, retrying transient failures up to the configured count.
    pub async fn upsert(&self, batch: &Batch) -> Result<UpsertOutcome, UpsertFailure> {
        let result = with_retry(&self.retry, |attempt| {
            tracing::debug!(
                doc_id = %batch.doc_id,
                namespace = %batch.namespace,
                chunks = batch.len(),
                attempt,
                "sending upsert"
            );
            self.transport.send(batch)
        })
        .await;

        match result {
            RetryResult::Success { value, attempts } => Ok(UpsertOutcome {
                status: value.and_then(|r| r.status),
                attempts,
            }),
            RetryResult::Failed {
                last_error,
                attempts,
            } => Err(UpsertFailure {
                error: last_error,
                attempts,
            }),
        }
    }
}
