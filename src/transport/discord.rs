//! Discord-style webhook client: one multipart POST per message.

use super::{Transport, TransportError, WebhookMessage};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

const ERROR_BODY_LIMIT: usize = 512;

/// Posts `payload_json` plus an optional `files[0]` part.
#[derive(Debug, Clone)]
pub struct DiscordWebhookTransport {
    client: Client,
}

impl DiscordWebhookTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build_form(message: &WebhookMessage) -> Result<Form, TransportError> {
        let payload_json = serde_json::to_string(&message.payload)
            .map_err(|e| TransportError::Serialization(e.to_string()))?;
        let mut form = Form::new().text("payload_json", payload_json);

        if let Some(attachment) = &message.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.filename.clone())
                .mime_str(&attachment.content_type)
                .map_err(|e| TransportError::Other(e.to_string()))?;
            form = form.part("files[0]", part);
        }

        Ok(form)
    }
}

impl Default for DiscordWebhookTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl Transport for DiscordWebhookTransport {
    async fn send(&self, endpoint: &str, message: &WebhookMessage) -> Result<(), TransportError> {
        debug!(
            content_len = message.payload.content.len(),
            attachment = ?message.attachment.as_ref().map(|a| a.filename.as_str()),
            "Posting webhook message"
        );

        let form = Self::build_form(message)?;
        // The endpoint URL is itself a credential; keep it out of error text.
        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(TransportError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Attachment, WebhookPayload};

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = Client::builder().no_proxy().build().unwrap();
        let transport = DiscordWebhookTransport::new(client);
        let message = WebhookMessage {
            payload: WebhookPayload {
                content: "hi".to_string(),
                username: None,
                avatar_url: None,
            },
            attachment: Some(Attachment::json("report_bsc.json", b"{}".to_vec())),
        };

        let err = transport
            .send("http://127.0.0.1:1/api/webhooks/1/secret-token", &message)
            .await
            .unwrap_err();
        match err {
            TransportError::NetworkError(msg) => assert!(!msg.contains("secret-token")),
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
