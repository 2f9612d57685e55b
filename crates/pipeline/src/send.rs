//! Outbound message delivery.
//!
//! The log never talks to phones directly; it hands outgoing messages to
//! the host SMS gateway over HTTP. [`OutboundSender`] is the seam that
//! keeps [`crate::reply::ReplyService`] testable without a gateway.

use std::time::Duration;

use async_trait::async_trait;
use smslog_core::message::MessageEnvelope;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for outbound delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// OutboundSender
// ---------------------------------------------------------------------------

/// Hands an outgoing message to the transport.
#[async_trait]
pub trait OutboundSender: Send + Sync {
    async fn send(&self, envelope: &MessageEnvelope) -> Result<(), SendError>;
}

// ---------------------------------------------------------------------------
// HttpOutboundSender
// ---------------------------------------------------------------------------

/// Delivers outgoing messages to the host gateway's send endpoint.
pub struct HttpOutboundSender {
    client: reqwest::Client,
    gateway_url: String,
}

impl HttpOutboundSender {
    /// Create a sender with a pre-configured HTTP client.
    pub fn new(gateway_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            gateway_url: gateway_url.into(),
        }
    }
}

#[async_trait]
impl OutboundSender for HttpOutboundSender {
    async fn send(&self, envelope: &MessageEnvelope) -> Result<(), SendError> {
        let payload = serde_json::json!({
            "backend": envelope.backend,
            "identity": envelope.identity,
            "text": envelope.text,
        });

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::error!(
                url = %self.gateway_url,
                status = response.status().as_u16(),
                "Gateway rejected outgoing message"
            );
            return Err(SendError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
