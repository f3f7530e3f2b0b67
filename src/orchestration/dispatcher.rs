//! Turns reports and error contexts into webhook messages and delivers them.

use crate::config::Config;
use crate::domain::{Report, ReportId, Severity};
use crate::engine::{
    cap_content, render_error, render_report, NotificationPolicy, RenderContext, SecretRedactor,
    SkipReason,
};
use crate::error::NotifierError;
use crate::transport::{Attachment, Transport, TransportError, WebhookMessage, WebhookPayload};
use serde::Serialize;
use std::sync::Arc;

/// What happened to one notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Skipped(SkipReason),
    Sent { level: Severity },
    /// The transport rejected the message. Logged, never raised.
    Failed {
        level: Severity,
        error: TransportError,
    },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

/// What the process was doing when an error surfaced, plus any data worth attaching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorContext {
    pub doing: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(doing: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            doing: doing.into(),
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn Transport>,
    config: Config,
    policy: NotificationPolicy,
    redactor: SecretRedactor,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn Transport>, config: Config) -> Self {
        let policy = NotificationPolicy::from_config(&config);
        let redactor = SecretRedactor::new(config.secrets());
        Self {
            transport,
            config,
            policy,
            redactor,
        }
    }

    pub fn policy(&self) -> &NotificationPolicy {
        &self.policy
    }

    /// Notify the report channel about a finished run.
    ///
    /// Delivery failures come back as `DispatchOutcome::Failed`. An `Err` means the
    /// report itself could not be rendered or serialized.
    pub async fn notify_report(
        &self,
        report: &Report,
        report_id: Option<ReportId>,
    ) -> Result<DispatchOutcome, NotifierError> {
        let endpoint = self.config.report_webhook_url.as_deref();
        let decision = self.policy.decide(report, endpoint.is_some());
        let endpoint = match (endpoint, decision.skip_reason) {
            (_, Some(reason)) => return Ok(DispatchOutcome::Skipped(reason)),
            (None, None) => return Ok(DispatchOutcome::Skipped(SkipReason::EndpointNotConfigured)),
            (Some(endpoint), None) => endpoint,
        };

        let chain = self.config.chains.get(report.chain());
        let mention = self.policy.mention(decision.level);
        let report_url = report_id.and_then(|id| self.config.report_url(id));
        let ctx = RenderContext {
            chain: &chain,
            level: decision.level,
            report_url: report_url.as_deref(),
            mention: mention.as_deref(),
            redactor: &self.redactor,
        };

        let content = render_report(report, &ctx)?;
        // full report for audit, sent as is
        let attachment = Attachment::json(
            report.attachment_name(),
            serde_json::to_vec_pretty(report)?,
        );

        let message = self.message(&content, Some(attachment));
        Ok(self.deliver(endpoint, &message, decision.level).await)
    }

    /// Notify the alert channel that something went wrong.
    pub async fn notify_error(
        &self,
        context: &ErrorContext,
        error: &(dyn std::error::Error + 'static),
    ) -> DispatchOutcome {
        let Some(endpoint) = self.config.alert_webhook_url.as_deref() else {
            tracing::warn!(
                doing = %context.doing,
                "Alert webhook not configured, skipping error notification"
            );
            return DispatchOutcome::Skipped(SkipReason::EndpointNotConfigured);
        };

        let mention = self.policy.mention(Severity::Error);
        let content = render_error(
            &context.doing,
            &context.data,
            error,
            mention.as_deref(),
            &self.redactor,
        );
        let message = self.message(&content, None);
        self.deliver(endpoint, &message, Severity::Error).await
    }

    fn message(&self, content: &str, attachment: Option<Attachment>) -> WebhookMessage {
        // secrets split across rendered pieces
        let content = cap_content(&self.redactor.redact(content));
        WebhookMessage {
            payload: WebhookPayload {
                content,
                username: self.config.username.clone(),
                avatar_url: self.config.avatar_url.clone(),
            },
            attachment,
        }
    }

    async fn deliver(
        &self,
        endpoint: &str,
        message: &WebhookMessage,
        level: Severity,
    ) -> DispatchOutcome {
        match self.transport.send(endpoint, message).await {
            Ok(()) => {
                tracing::info!(level = %level, "Notification sent");
                DispatchOutcome::Sent { level }
            }
            Err(error) => {
                tracing::error!(
                    level = %level,
                    error = %self.redactor.redact(&error.to_string()),
                    "Failed to send notification"
                );
                DispatchOutcome::Failed { level, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    const REPORT_JSON: &str = r#"{
        "type": "harvest",
        "chain": "bsc",
        "generated_at": "2024-05-01T12:00:00Z",
        "summary": {
            "statuses": {"error": 1, "warning": 0, "notice": 0, "info": 0},
            "gas_used": {"raw": "0", "scale": 18},
            "total_strategies": 1,
            "harvested": 0,
            "skipped": 0
        },
        "details": [
            {"vault_id": "cake-bnb", "strategy_address": "0xaaa", "status": "error",
             "message": "rpc https://rpc.example/key-123 timed out"}
        ]
    }"#;

    fn config() -> Config {
        Config {
            report_webhook_url: Some("https://hooks.example/report".to_string()),
            alert_webhook_url: Some("https://hooks.example/alert".to_string()),
            ping_enabled: true,
            ping_role_ids: vec!["42".to_string()],
            extra_secrets: vec!["key-123".to_string()],
            ..Config::default()
        }
    }

    fn dispatcher(config: Config) -> (NotificationDispatcher, MockTransport) {
        let mock = MockTransport::new();
        (
            NotificationDispatcher::new(Arc::new(mock.clone()), config),
            mock,
        )
    }

    #[tokio::test]
    async fn test_report_sent_with_attachment_and_mention() {
        let (dispatcher, mock) = dispatcher(config());
        let report = Report::from_json_str(REPORT_JSON).unwrap();

        let outcome = dispatcher
            .notify_report(&report, Some(ReportId::new(9)))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Sent {
                level: Severity::Error
            }
        );

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].endpoint, "https://hooks.example/report");
        let content = &sent[0].message.payload.content;
        assert!(content.contains("[ERROR]"));
        assert!(content.contains("<@&42>"));
        assert!(!content.contains("key-123"));

        let attachment = sent[0].message.attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "report_bsc.json");
        let attached: Report = serde_json::from_slice(&attachment.bytes).unwrap();
        assert_eq!(attached, report);
    }

    #[tokio::test]
    async fn test_short_secrets_keep_overflow_note_within_limit() {
        let (dispatcher, mock) = dispatcher(Config {
            extra_secrets: vec!["k1".to_string()],
            ..config()
        });
        let details: Vec<serde_json::Value> = (0..150)
            .map(|i| {
                serde_json::json!({
                    "vault_id": format!("vault-{}", i),
                    "strategy_address": "0xaaa",
                    "status": "error",
                    "message": "k1 ".repeat(30),
                })
            })
            .collect();
        let mut value: serde_json::Value = serde_json::from_str(REPORT_JSON).unwrap();
        value["details"] = serde_json::Value::Array(details);
        let report: Report = serde_json::from_value(value).unwrap();

        dispatcher.notify_report(&report, None).await.unwrap();

        let content = mock.sent()[0].message.payload.content.clone();
        assert!(!content.contains("k1"));
        assert!(content.chars().count() <= crate::engine::CONTENT_LIMIT);
        assert!(content.ends_with("more (see attachment)\n"));
    }

    #[tokio::test]
    async fn test_missing_report_endpoint_skips() {
        let (dispatcher, mock) = dispatcher(Config {
            report_webhook_url: None,
            ..config()
        });
        let report = Report::from_json_str(REPORT_JSON).unwrap();

        let outcome = dispatcher.notify_report(&report, None).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::EndpointNotConfigured)
        );
        assert_eq!(mock.send_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned_not_raised() {
        let mock = MockTransport::failing(TransportError::HttpError {
            status: 500,
            message: "boom".to_string(),
        });
        let dispatcher = NotificationDispatcher::new(Arc::new(mock.clone()), config());
        let report = Report::from_json_str(REPORT_JSON).unwrap();

        let outcome = dispatcher.notify_report(&report, None).await.unwrap();
        assert!(matches!(
            outcome,
            DispatchOutcome::Failed {
                level: Severity::Error,
                error: TransportError::HttpError { status: 500, .. }
            }
        ));
        assert!(!outcome.is_sent());
        assert_eq!(mock.send_count(), 1);
    }

    #[tokio::test]
    async fn test_error_alert_goes_to_alert_endpoint() {
        let (dispatcher, mock) = dispatcher(config());
        let err = std::io::Error::new(std::io::ErrorKind::Other, "token key-123 rejected");
        let context = ErrorContext::new("Harvesting bsc", serde_json::json!({"vault": "cake-bnb"}));

        let outcome = dispatcher.notify_error(&context, &err).await;
        assert!(outcome.is_sent());

        let sent = mock.sent();
        assert_eq!(sent[0].endpoint, "https://hooks.example/alert");
        assert!(sent[0].message.attachment.is_none());
        let content = &sent[0].message.payload.content;
        assert!(content.contains("Harvesting bsc"));
        assert!(content.contains("cake-bnb"));
        assert!(!content.contains("key-123"));
    }

    #[tokio::test]
    async fn test_error_alert_without_endpoint() {
        let (dispatcher, mock) = dispatcher(Config {
            alert_webhook_url: None,
            ..config()
        });
        let err = std::io::Error::new(std::io::ErrorKind::Other, "x");
        let outcome = dispatcher
            .notify_error(&ErrorContext::new("x", serde_json::Value::Null), &err)
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::EndpointNotConfigured)
        );
        assert_eq!(mock.send_count(), 0);
    }
}
