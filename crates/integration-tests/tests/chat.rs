//! Shop assistant endpoint.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use petal_integration_tests::{TestApp, test_config, unreachable_claude};
use serde_json::json;

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app.guest().post("/chat", json!({ "message": "   " })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn test_overlong_message_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app
        .guest()
        .post("/chat", json!({ "message": "a".repeat(1001) }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_price_question_gets_local_reply() {
    let app = TestApp::spawn().await;
    let res = app
        .guest()
        .post("/chat", json!({ "message": "What are your prices like?" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["source"], "local");

    let reply = res.body["reply"].as_str().unwrap();
    assert!(reply.contains("price"));
    assert!(reply.contains("$18.99"));
    assert!(reply.contains("$89.00"));
}

#[tokio::test]
async fn test_history_is_accepted() {
    let app = TestApp::spawn().await;
    let history: Vec<_> = (0..30)
        .map(|i| json!({ "role": if i % 2 == 0 { "user" } else { "assistant" }, "content": "x".repeat(3000) }))
        .collect();

    let res = app
        .guest()
        .post("/chat", json!({ "message": "hello", "history": history }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["source"], "local");
}

#[tokio::test]
async fn test_unreachable_ai_falls_back_to_local() {
    let mut config = test_config();
    config.claude = Some(unreachable_claude());
    let app = TestApp::with_config(config).await;

    let health = app.guest().get("/health").await;
    assert_eq!(health.body["ai"], true);

    let res = app
        .guest()
        .post("/chat", json!({ "message": "Do you deliver on weekends?" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["source"], "local");
    assert!(res.body["reply"].as_str().unwrap().contains("deliver"));
}
