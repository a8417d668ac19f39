//! Cross-cutting HTTP behaviour: health, headers, fallbacks.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode, header};
use petal_integration_tests::{TestApp, test_config};

#[tokio::test]
async fn test_health_reports_counts() {
    let app = TestApp::spawn().await;
    let res = app.guest().get("/health").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["flowers"], 7);
    assert_eq!(res.body["orders"], 0);
    assert_eq!(res.body["ai"], false);
}

#[tokio::test]
async fn test_unseeded_store_is_empty() {
    let mut config = test_config();
    config.seed_catalog = false;
    let app = TestApp::with_config(config).await;

    let res = app.guest().get("/flowers").await;
    assert_eq!(res.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_every_response_has_request_id_and_security_headers() {
    let app = TestApp::spawn().await;
    let mut guest = app.guest();

    for res in [
        guest.get("/health").await,
        guest.get("/orders").await,
        guest.get("/no/such/route").await,
    ] {
        assert!(res.headers.contains_key("x-request-id"));
        assert_eq!(res.headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            res.headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        assert!(res.headers.contains_key(header::REFERRER_POLICY));
    }
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = TestApp::spawn().await;
    let res = app.guest().get("/no/such/route").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "Not found");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = TestApp::spawn().await;
    let res = app.guest().send(Method::PUT, "/flowers", None).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}
