mod support;

use pharmawatch::models::{Credentials, HttpConfig, NotifyConfig};
use pharmawatch::services::{DeliveryFailure, Notifier, TelegramNotifier};
use serde_json::Value;

use support::{StubResponse, StubServer, closed_port_url};

const TOKEN: &str = "123456:secret-token";

fn notifier_for(api_base: &str) -> TelegramNotifier {
    let notify = NotifyConfig {
        api_base: api_base.to_string(),
        ..NotifyConfig::default()
    };
    TelegramNotifier::new(
        &HttpConfig::default(),
        &notify,
        &Credentials::new(TOKEN, "-1001"),
    )
    .unwrap()
}

#[test]
fn acknowledged_message_is_delivered() {
    let server = StubServer::spawn(|_| {
        StubResponse::ok(r#"{"ok":true,"result":{"message_id":7}}"#)
    });

    let result = notifier_for(&server.base_url).notify("<b>New post</b>");
    assert!(result.delivered);
    assert_eq!(result.failure, None);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, format!("/bot{TOKEN}/sendMessage"));

    let payload: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(payload["chat_id"], "-1001");
    assert_eq!(payload["text"], "<b>New post</b>");
    assert_eq!(payload["parse_mode"], "HTML");
    assert_eq!(payload["disable_web_page_preview"], true);
}

#[test]
fn declined_message_is_rejected_with_description() {
    let server = StubServer::spawn(|_| {
        StubResponse::status(
            400,
            r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities"}"#,
        )
    });

    let result = notifier_for(&server.base_url).notify("<b>broken");
    assert!(!result.delivered);
    assert_eq!(result.failure, Some(DeliveryFailure::Rejected));
    let detail = result.detail.unwrap();
    assert!(detail.contains("can't parse entities"));
    assert!(detail.contains("400"));
}

#[test]
fn ok_false_with_success_status_is_rejected() {
    let server = StubServer::spawn(|_| StubResponse::ok(r#"{"ok":false,"description":"nope"}"#));

    let result = notifier_for(&server.base_url).notify("hi");
    assert_eq!(result.failure, Some(DeliveryFailure::Rejected));
}

#[test]
fn unparseable_acknowledgement_is_rejected() {
    let server = StubServer::spawn(|_| StubResponse::status(502, "<html>Bad Gateway</html>"));

    let result = notifier_for(&server.base_url).notify("hi");
    assert!(!result.delivered);
    assert_eq!(result.failure, Some(DeliveryFailure::Rejected));
}

#[test]
fn unreachable_sink_is_transport_failure_without_token() {
    let result = notifier_for(&closed_port_url()).notify("hi");

    assert!(!result.delivered);
    assert_eq!(result.failure, Some(DeliveryFailure::Transport));
    assert!(!result.detail.unwrap().contains("secret-token"));
}
