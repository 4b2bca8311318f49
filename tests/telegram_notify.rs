// tests/telegram_notify.rs

mod common;
use crate::common::http_stub::{closed_port_url, HttpStub, RecordedRequest, StubResponse};
use crate::common::{init_tracing, with_timeout};

use std::collections::HashMap;

use reqwest::Url;

use pagewatch::capture::CapturedImage;
use pagewatch::errors::PagewatchError;
use pagewatch::notify::{Notifier, TelegramNotifier};

const TOKEN: &str = "123456:SECRET-token";
const CHAT_ID: &str = "987654";

fn form_fields(request: &RecordedRequest) -> HashMap<String, String> {
    let url = Url::parse(&format!("http://form.local/?{}", request.body_text())).unwrap();
    url.query_pairs().into_owned().collect()
}

fn notify_error(result: Result<(), PagewatchError>) -> String {
    match result {
        Err(PagewatchError::Notify(msg)) => msg,
        other => panic!("expected a notify error, got {other:?}"),
    }
}

#[tokio::test]
async fn send_text_posts_a_form_to_send_message() {
    init_tracing();

    let stub = HttpStub::serving(StubResponse::json(r#"{"ok":true,"result":{}}"#)).await;
    let notifier = TelegramNotifier::new(&stub.base_url(), TOKEN, CHAT_ID).unwrap();

    with_timeout(notifier.send_text("⚠️ Website changed!\nhttps://a.example/?x=1&y=2"))
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path(), format!("/bot{TOKEN}/sendMessage"));
    assert!(
        request
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
    );

    let fields = form_fields(request);
    assert_eq!(fields["chat_id"], CHAT_ID);
    assert_eq!(fields["text"], "⚠️ Website changed!\nhttps://a.example/?x=1&y=2");
}

#[tokio::test]
async fn send_photo_posts_multipart_to_send_photo() {
    init_tracing();

    let stub = HttpStub::serving(StubResponse::json(r#"{"ok":true,"result":{}}"#)).await;
    let notifier = TelegramNotifier::new(&stub.base_url(), TOKEN, CHAT_ID).unwrap();
    let image = CapturedImage::jpeg(b"JPEG-BYTES".to_vec(), "www_bmeia_gv_at.jpg");

    with_timeout(notifier.send_photo(&image, "⚠️ embassy changed"))
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path(), format!("/bot{TOKEN}/sendPhoto"));
    assert!(
        request
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    );

    let body = request.body_text();
    assert!(body.contains(r#"name="chat_id""#));
    assert!(body.contains(CHAT_ID));
    assert!(body.contains(r#"name="caption""#));
    assert!(body.contains("⚠️ embassy changed"));
    assert!(body.contains(r#"name="photo"; filename="www_bmeia_gv_at.jpg""#));
    assert!(body.contains("image/jpeg"));
    assert!(body.contains("JPEG-BYTES"));
}

#[tokio::test]
async fn api_rejection_is_a_failure_with_its_description() {
    init_tracing();

    let stub = HttpStub::serving(StubResponse::with_status(
        400,
        "application/json",
        br#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
    ))
    .await;
    let notifier = TelegramNotifier::new(&stub.base_url(), TOKEN, CHAT_ID).unwrap();

    let msg = notify_error(with_timeout(notifier.send_text("hello")).await);

    assert!(msg.contains("sendMessage"), "{msg}");
    assert!(msg.contains("chat not found"), "{msg}");
    assert!(!msg.contains("SECRET"), "{msg}");
}

#[tokio::test]
async fn ok_false_with_success_status_is_still_a_failure() {
    init_tracing();

    let stub = HttpStub::serving(StubResponse::json(
        r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#,
    ))
    .await;
    let notifier = TelegramNotifier::new(&stub.base_url(), TOKEN, CHAT_ID).unwrap();

    let msg = notify_error(with_timeout(notifier.send_text("hello")).await);
    assert!(msg.contains("bot was blocked"), "{msg}");
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_token() {
    init_tracing();

    let endpoint = closed_port_url("").await;
    let notifier = TelegramNotifier::new(&endpoint, TOKEN, CHAT_ID).unwrap();
    let image = CapturedImage::jpeg(vec![1, 2, 3], "x.jpg");

    let text_err = notify_error(with_timeout(notifier.send_text("hello")).await);
    let photo_err = notify_error(with_timeout(notifier.send_photo(&image, "cap")).await);

    for msg in [text_err, photo_err] {
        assert!(msg.contains("request failed"), "{msg}");
        assert!(!msg.contains(TOKEN), "{msg}");
        assert!(!msg.contains("SECRET"), "{msg}");
    }
}

#[test]
fn debug_output_hides_the_token() {
    let notifier = TelegramNotifier::new("https://api.telegram.org", TOKEN, CHAT_ID).unwrap();
    let debug = format!("{notifier:?}");
    assert!(debug.contains(CHAT_ID));
    assert!(!debug.contains("SECRET"));
}

#[test]
fn missing_credentials_are_rejected() {
    assert!(TelegramNotifier::new("https://api.telegram.org", " ", CHAT_ID).is_err());
    assert!(TelegramNotifier::new("https://api.telegram.org", TOKEN, "").is_err());
}
