//! Mock transport for testing without network calls.

use super::{Transport, TransportError, WebhookMessage};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub endpoint: String,
    pub message: WebhookMessage,
}

/// Records every message it is asked to send. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failure: Option<TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record sends but fail each one with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, endpoint: &str, message: &WebhookMessage) -> Result<(), TransportError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage {
                endpoint: endpoint.to_string(),
                message: message.clone(),
            });
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::WebhookPayload;

    fn message(content: &str) -> WebhookMessage {
        WebhookMessage {
            payload: WebhookPayload {
                content: content.to_string(),
                username: None,
                avatar_url: None,
            },
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_mock_records_sends() {
        let mock = MockTransport::new();
        let shared = mock.clone();
        mock.send("https://hook", &message("one")).await.unwrap();
        mock.send("https://hook", &message("two")).await.unwrap();

        assert_eq!(shared.send_count(), 2);
        assert_eq!(shared.sent()[1].message.payload.content, "two");
        assert_eq!(shared.sent()[0].endpoint, "https://hook");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockTransport::failing(TransportError::HttpError {
            status: 500,
            message: "down".to_string(),
        });
        let err = mock.send("https://hook", &message("x")).await.unwrap_err();
        assert!(matches!(err, TransportError::HttpError { status: 500, .. }));
        assert_eq!(mock.send_count(), 1);
    }
}
