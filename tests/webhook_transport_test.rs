//! Webhook delivery over real HTTP against a local mock server.

use harvest_notifier::transport::{Attachment, WebhookMessage, WebhookPayload};
use harvest_notifier::{
    Config, DiscordWebhookTransport, DispatchOutcome, ErrorContext, NotificationDispatcher, Report,
    Severity, Transport, TransportError,
};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOOK_PATH: &str = "/api/webhooks/123/hook-secret";

fn transport() -> DiscordWebhookTransport {
    DiscordWebhookTransport::new(reqwest::Client::builder().no_proxy().build().unwrap())
}

fn message() -> WebhookMessage {
    WebhookMessage {
        payload: WebhookPayload {
            content: "### [INFO] Harvest report for BSC".to_string(),
            username: Some("harvester".to_string()),
            avatar_url: None,
        },
        attachment: Some(Attachment::json(
            "report_bsc.json",
            br#"{"type":"harvest"}"#.to_vec(),
        )),
    }
}

#[tokio::test]
async fn test_multipart_post_with_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), HOOK_PATH);
    transport().send(&endpoint, &message()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="payload_json""#));
    assert!(body.contains(r#""username":"harvester""#));
    assert!(!body.contains("avatar_url"));
    assert!(body.contains("files[0]"));
    assert!(body.contains(r#"filename="report_bsc.json""#));
    assert!(body.contains(r#"{"type":"harvest"}"#));
}

#[tokio::test]
async fn test_server_error_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), HOOK_PATH);
    let err = transport().send(&endpoint, &message()).await.unwrap_err();
    assert_eq!(
        err,
        TransportError::HttpError {
            status: 500,
            message: "upstream exploded".to_string(),
        }
    );
}

#[tokio::test]
async fn test_dispatcher_over_http_keeps_endpoint_private() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), HOOK_PATH);
    let config = Config {
        alert_webhook_url: Some(endpoint.clone()),
        ..Config::default()
    };
    let dispatcher = NotificationDispatcher::new(Arc::new(transport()), config);

    let err = std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("POST {} failed", endpoint),
    );
    let context = ErrorContext::new("Posting report", serde_json::json!({"url": endpoint}));
    let outcome = dispatcher.notify_error(&context, &err).await;
    assert_eq!(
        outcome,
        DispatchOutcome::Sent {
            level: Severity::Error
        }
    );

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("Posting report"));
    assert!(body.contains("[redacted]"));
    assert!(!body.contains("hook-secret"));
}

#[tokio::test]
async fn test_dispatcher_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let config = Config {
        report_webhook_url: Some(format!("{}{}", server.uri(), HOOK_PATH)),
        ..Config::default()
    };
    let dispatcher = NotificationDispatcher::new(Arc::new(transport()), config);
    let report = Report::from_json_str(
        r#"{
            "type": "unwrap",
            "chain": "fantom",
            "generated_at": "2024-05-01T12:00:00Z",
            "summary": {
                "statuses": {"error": 1},
                "gas_used": {"raw": "0", "scale": 18},
                "success": false,
                "unwrapped": false
            },
            "details": [{"name": "unwrap", "status": "error", "message": "reverted"}]
        }"#,
    )
    .unwrap();

    let outcome = dispatcher.notify_report(&report, None).await.unwrap();
    match outcome {
        DispatchOutcome::Failed { level, error } => {
            assert_eq!(level, Severity::Error);
            assert!(matches!(error, TransportError::HttpError { status: 429, .. }));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
