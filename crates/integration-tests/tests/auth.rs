//! Login, signup, logout and session handling.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use petal_integration_tests::{ADMIN_EMAIL, CUSTOMER_EMAIL, CUSTOMER_PASSWORD, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let app = TestApp::spawn().await;
    let mut client = app.guest();

    let res = client
        .post(
            "/auth/login",
            json!({ "email": CUSTOMER_EMAIL, "password": CUSTOMER_PASSWORD }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["email"], CUSTOMER_EMAIL);
    assert_eq!(res.body["role"], "customer");
    assert!(res.body.get("passwordHash").is_none());

    let cookie = res.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("petal_session="));
    assert!(cookie.contains("HttpOnly"));

    let me = client.get("/auth/me").await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], CUSTOMER_EMAIL);
}

#[tokio::test]
async fn test_bad_credentials_look_the_same() {
    let app = TestApp::spawn().await;

    let wrong_password = app
        .guest()
        .post(
            "/auth/login",
            json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }),
        )
        .await;
    let unknown_email = app
        .guest()
        .post(
            "/auth/login",
            json!({ "email": "stranger@petal.test", "password": "not-the-password" }),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_signup_signs_in_as_customer() {
    let app = TestApp::spawn().await;
    let mut client = app.guest();

    let res = client
        .post(
            "/auth/signup",
            json!({ "name": "Fern Gully", "email": "Fern@Example.com", "password": "fronds-and-moss" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["role"], "customer");
    assert_eq!(res.body["email"], "fern@example.com");

    let me = client.get("/auth/me").await;
    assert_eq!(me.body["name"], "Fern Gully");

    let admin_only = client.get("/orders").await;
    assert_eq!(admin_only.status, StatusCode::OK);
    assert_eq!(admin_only.body, json!([]));
}

#[tokio::test]
async fn test_signup_rejections() {
    let app = TestApp::spawn().await;
    let mut client = app.guest();

    let duplicate = client
        .post(
            "/auth/signup",
            json!({ "name": "Copy Cat", "email": CUSTOMER_EMAIL, "password": "long-enough-pw" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let short = client
        .post(
            "/auth/signup",
            json!({ "name": "Shorty", "email": "shorty@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let nameless = client
        .post(
            "/auth/signup",
            json!({ "name": " ", "email": "blank@example.com", "password": "long-enough-pw" }),
        )
        .await;
    assert_eq!(nameless.status, StatusCode::BAD_REQUEST);
    assert!(!client.has_cookie());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::spawn().await;
    let mut client = app.customer().await;
    assert!(client.has_cookie());

    let res = client.post("/auth/logout", json!({})).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(client.get("/auth/me").await.status, StatusCode::UNAUTHORIZED);

    let again = client.post("/auth/logout", json!({})).await;
    assert_eq!(again.status, StatusCode::NO_CONTENT);

    let guest = app.guest().post("/auth/logout", json!({})).await;
    assert_eq!(guest.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_tampered_cookie_is_ignored() {
    let app = TestApp::spawn().await;
    let customer = app.customer().await;
    let tampered = format!("{}x", customer.cookie().unwrap());

    let mut client = app.guest();
    client.set_cookie(tampered);
    let res = client.get("/auth/me").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Authentication required");
}
