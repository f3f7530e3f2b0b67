//! Transport abstraction for delivering notifications to chat webhooks.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

pub mod discord;
pub mod mock;

pub use discord::DiscordWebhookTransport;
pub use mock::{MockTransport, SentMessage};

/// Delivers one message to one endpoint.
///
/// A single attempt per call: implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, endpoint: &str, message: &WebhookMessage) -> Result<(), TransportError>;
}

/// JSON part of a webhook post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// File part of a webhook post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn json(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "application/json".to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookMessage {
    pub payload: WebhookPayload,
    pub attachment: Option<Attachment>,
}

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network error (e.g., connection refused, DNS failure)
    NetworkError(String),
    /// Non-success HTTP response
    HttpError { status: u16, message: String },
    /// Payload could not be encoded
    Serialization(String),
    /// Other error
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            TransportError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            TransportError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            TransportError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}
