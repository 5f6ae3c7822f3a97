#![allow(missing_docs, unused_results)]

use std::time::Duration;

use assert_matches::assert_matches;
use pushover_client::Client;
use pushover_core::{DispatchError, Glance, GlanceField, Message, Priority, RetryPolicy};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAST: Duration = Duration::from_millis(10);

fn accepted() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "status": 1,
        "request": "647d2300-702c-4b38-8b2f-d56326ae460b"
    }))
}

#[tokio::test]
async fn delivers_emergency_message_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .and(body_string_contains("token=app-token"))
        .and(body_string_contains("priority=2"))
        .and(body_string_contains("retry=60"))
        .and(body_string_contains("expire=3600"))
        .and(body_string_contains("device=phone%2Cwatch"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new("app-token").with_base_url(server.uri());
    let message = Message::new("user-key", "disk full")
        .with_device("phone")
        .with_device("watch")
        .emergency(60, 3600);

    let receipt = client
        .dispatch(&message.into(), RetryPolicy::new(3, FAST), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(receipt.status, 200);
    assert_eq!(receipt.attempts, 1);
    assert_eq!(
        receipt.request.as_deref(),
        Some("647d2300-702c-4b38-8b2f-d56326ae460b")
    );
}

#[tokio::test]
async fn glance_removal_sends_empty_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/glances.json"))
        .and(body_string_contains("count=&"))
        .and(body_string_contains("text=Deploying"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new("app-token").with_base_url(server.uri());
    let glance = Glance::new("user-key")
        .text(GlanceField::Set("Deploying".to_string()))
        .count(GlanceField::Remove);

    assert!(client.send(&glance.into()).await.is_ok());
}

#[tokio::test]
async fn retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(accepted())
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new("app-token").with_base_url(server.uri());
    let receipt = client
        .dispatch(
            &Message::new("u", "m").into(),
            RetryPolicy::new(0, FAST),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(receipt.attempts, 3);
}

#[tokio::test]
async fn invalid_token_is_fatal_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "token": "invalid",
            "errors": ["application token is invalid"],
            "status": 0,
            "request": "5042853c-402d-4a18-abcb-168734a801de"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new("bad-token").with_base_url(server.uri());
    let err = client
        .dispatch(
            &Message::new("u", "m").with_priority(Priority::High).into(),
            RetryPolicy::unlimited().with_delay(FAST),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_matches!(err, DispatchError::Fatal { status: Some(400), .. });
    assert_eq!(err.to_string(), "400: application token is invalid");
}

#[tokio::test]
async fn gives_up_after_cap() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::new("app-token").with_base_url(server.uri());
    let err = client
        .dispatch(
            &Message::new("u", "m").into(),
            RetryPolicy::new(2, FAST),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_matches!(err, DispatchError::Temporary { status: Some(502), .. });
}

#[tokio::test]
async fn unreachable_service_is_temporary() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = Client::new("app-token").with_base_url(format!("http://127.0.0.1:{port}"));
    let err = client
        .dispatch(
            &Message::new("u", "m").into(),
            RetryPolicy::new(2, FAST),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_temporary());
    assert_eq!(err.status(), None);
}

/// Sends a real message and glance. Needs `PUSHOVER_TEST_APP_TOKEN` and
/// `PUSHOVER_TEST_USER_TOKEN`; run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore = "talks to the live Pushover API"]
async fn live_api_round_trip() {
    let (Ok(app), Ok(user)) = (
        std::env::var("PUSHOVER_TEST_APP_TOKEN"),
        std::env::var("PUSHOVER_TEST_USER_TOKEN"),
    ) else {
        eprintln!("PUSHOVER_TEST_APP_TOKEN / PUSHOVER_TEST_USER_TOKEN not set, skipping");
        return;
    };

    let client = Client::new(app);
    let now = unix_now();

    client
        .send_message(&user, &format!("live_api_round_trip {now}"))
        .await
        .unwrap();

    let glance = Glance::new(user)
        .title(GlanceField::Set("live_api_round_trip".to_string()))
        .text(GlanceField::Set(now.to_string()));
    client.send(&glance.into()).await.unwrap();
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
