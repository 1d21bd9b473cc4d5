//! # Webhook Server Tests
//!
//! Drives the axum router with signed and unsigned requests and records the
//! replies the bot tries to send.

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use er_finder::bot::BotContext;
use er_finder::catalog::{FacilityCatalog, FacilityRecord};
use er_finder::line::signature::sign;
use er_finder::line::ReplySender;
use er_finder::localization::Localization;
use er_finder::query::QueryInterpreter;
use er_finder::reply::Reply;
use er_finder::server::{router, AppState};

const SECRET: &str = "channel-secret";

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(String, Reply)>>,
    fail: bool,
}

impl RecordingSender {
    fn sent(&self) -> Vec<(String, Reply)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn reply(&self, reply_token: &str, reply: &Reply) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), reply.clone()));
        if self.fail {
            anyhow::bail!("reply API unavailable");
        }
        Ok(())
    }
}

fn app(sender: Arc<RecordingSender>) -> axum::Router {
    let catalog = FacilityCatalog::new(vec![FacilityRecord {
        name: Some("臺大醫院".to_string()),
        address: Some("台北市中正區中山南路7號".to_string()),
        phone: Some("02-23123456".to_string()),
        city: Some("台北市".to_string()),
        region: Some("中正區".to_string()),
        district: None,
    }]);
    let bot = BotContext::new(
        catalog,
        QueryInterpreter::default(),
        Localization::new(None).unwrap(),
    );
    router(AppState::new(bot, sender, SECRET))
}

fn callback_request(body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/callback")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("X-Line-Signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

const TEXT_EVENT: &str = r#"{"destination":"U0","events":[
    {"type":"message","replyToken":"reply-1","message":{"type":"text","id":"1","text":"查詢 中正區 醫院"}}
]}"#;

#[tokio::test]
async fn test_bad_signature_is_rejected_without_reply() {
    let sender = Arc::new(RecordingSender::default());
    let response = app(sender.clone())
        .oneshot(callback_request(
            TEXT_EVENT,
            Some(sign("wrong-secret", TEXT_EVENT.as_bytes()).unwrap()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let sender = Arc::new(RecordingSender::default());
    let response = app(sender.clone())
        .oneshot(callback_request(TEXT_EVENT, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_signed_text_event_gets_one_reply() {
    let sender = Arc::new(RecordingSender::default());
    let signature = sign(SECRET, TEXT_EVENT.as_bytes()).unwrap();
    let response = app(sender.clone())
        .oneshot(callback_request(TEXT_EVENT, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "reply-1");
    assert!(sent[0].1.summary().contains("臺大醫院"));
}

#[tokio::test]
async fn test_each_repliable_event_is_answered() {
    let body = r#"{"destination":"U0","events":[
        {"type":"postback","replyToken":"r1","postback":{"data":"action=show_clinics&city=台北市&district=中正區"}},
        {"type":"postback","replyToken":"r2","postback":{"data":"action=show_clinics"}},
        {"type":"message","replyToken":"r3","message":{"type":"sticker","id":"9"}},
        {"type":"unfollow"}
    ]}"#;
    let sender = Arc::new(RecordingSender::default());
    let response = app(sender.clone())
        .oneshot(callback_request(body, Some(sign(SECRET, body.as_bytes()).unwrap())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = sender.sent();
    let tokens: Vec<&str> = sent.iter().map(|(token, _)| token.as_str()).collect();
    assert_eq!(tokens, vec!["r1", "r2", "r3"]);
    assert!(matches!(sent[0].1, Reply::Carousel { .. }));
    assert_eq!(
        sent[1].1,
        Reply::text("抱歉，無法處理這個選項，請輸入「選單」重新開始。")
    );
}

#[tokio::test]
async fn test_malformed_event_does_not_drop_the_batch() {
    let body = r#"{"destination":"U0","events":[
        {"type":"message","replyToken":"r1","message":{"type":"text","id":"1","text":"選單"}},
        {"type":"postback","replyToken":"r2","postback":{}}
    ]}"#;
    let sender = Arc::new(RecordingSender::default());
    let response = app(sender.clone())
        .oneshot(callback_request(body, Some(sign(SECRET, body.as_bytes()).unwrap())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "r1");
    assert!(matches!(sent[0].1, Reply::Choices { .. }));
}

#[tokio::test]
async fn test_send_failure_still_acknowledges() {
    let sender = Arc::new(RecordingSender {
        fail: true,
        ..Default::default()
    });
    let signature = sign(SECRET, TEXT_EVENT.as_bytes()).unwrap();
    let response = app(sender.clone())
        .oneshot(callback_request(TEXT_EVENT, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // Attempted once, never retried
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn test_signed_garbage_body_is_rejected() {
    let body = "not json";
    let sender = Arc::new(RecordingSender::default());
    let response = app(sender.clone())
        .oneshot(callback_request(body, Some(sign(SECRET, body.as_bytes()).unwrap())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::new(RecordingSender::default()))
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
