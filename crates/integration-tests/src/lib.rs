//! Integration test harness for the Petal storefront.
//!
//! Builds the real router (every middleware included) around a fresh store
//! and drives it in-process with `tower::ServiceExt::oneshot`. No sockets, no
//! external services.
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! let mut admin = app.admin().await;
//! let res = admin.get("/orders").await;
//! assert_eq!(res.status, StatusCode::OK);
//! ```

#![allow(clippy::missing_panics_doc)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use petal_core::{Email, Role};
use petal_storefront::{
    AppState, app,
    config::{AccountPassword, ClaudeConfig, FixedAccount, ShopContact, StorefrontConfig},
    db::{CatalogStore, seed::seed_catalog},
    services::AuthService,
};

pub const ADMIN_EMAIL: &str = "owner@petal.test";
pub const ADMIN_PASSWORD: &str = "garden-gate-42";
pub const CUSTOMER_EMAIL: &str = "demo@petal.test";
pub const CUSTOMER_PASSWORD: &str = "tulip-time-7";

/// Configuration used by every test app.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("integration-test-session-secret-Zq8Lm2Vx7Rt4"),
        session_ttl_hours: 24,
        seed_catalog: true,
        static_dir: None,
        cors_origin: None,
        accounts: vec![
            account("Shop Owner", ADMIN_EMAIL, Role::Admin, ADMIN_PASSWORD),
            account("Demo Customer", CUSTOMER_EMAIL, Role::Customer, CUSTOMER_PASSWORD),
        ],
        claude: None,
        contact: ShopContact::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn account(name: &str, email: &str, role: Role, password: &str) -> FixedAccount {
    FixedAccount {
        name: name.to_string(),
        email: Email::parse(email).expect("test email is valid"),
        role,
        password: AccountPassword::Plain(SecretString::from(password)),
    }
}

/// Claude settings pointing at a port nothing listens on.
#[must_use]
pub fn unreachable_claude() -> ClaudeConfig {
    ClaudeConfig {
        api_key: SecretString::from("sk-ant-integration-test"),
        model: "test-model".to_string(),
        api_url: "http://127.0.0.1:9/v1/messages".to_string(),
        timeout: Duration::from_secs(2),
    }
}

/// A running application.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Seeded catalog plus one admin and one customer account.
    pub async fn spawn() -> Self {
        Self::with_config(test_config()).await
    }

    /// Start from `config`, seeding and creating accounts the way `main` does.
    pub async fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::with_store(config, CatalogStore::new())
            .expect("test state builds");

        if state.config().seed_catalog {
            seed_catalog(state.store()).await;
        }
        let auth = AuthService::new(state.store());
        for account in &state.config().accounts {
            auth.ensure_account(account)
                .await
                .expect("test account is created");
        }

        let router = app(state.clone());
        Self { state, router }
    }

    /// A client without a session.
    #[must_use]
    pub fn guest(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// A client signed in as the fixed admin.
    pub async fn admin(&self) -> TestClient {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// A client signed in as the fixed customer.
    pub async fn customer(&self) -> TestClient {
        self.login(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await
    }

    /// A client signed in with the given credentials.
    pub async fn login(&self, email: &str, password: &str) -> TestClient {
        let mut client = self.guest();
        let res = client
            .post("/auth/login", json!({ "email": email, "password": password }))
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        client
    }

    /// Id of the first seeded flower whose name contains `name`.
    pub async fn flower_id(&self, name: &str) -> String {
        let res = self.guest().get("/flowers").await;
        res.body
            .as_array()
            .expect("flower list is an array")
            .iter()
            .find(|f| f["name"].as_str().is_some_and(|n| n.contains(name)))
            .and_then(|f| f["id"].as_str())
            .expect("seeded flower exists")
            .to_string()
    }
}

/// A client that carries the session cookie between requests.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

/// Status, headers and parsed JSON body (`Null` when empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestClient {
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::POST, path, Some(body.to_string())).await
    }

    pub async fn patch(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, path, Some(body.to_string())).await
    }

    pub async fn delete(&mut self, path: &str) -> TestResponse {
        self.send(Method::DELETE, path, None).await
    }

    /// Send a raw body with a JSON content type.
    pub async fn send(&mut self, method: Method, path: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        self.store_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Whether the client currently holds a session cookie.
    #[must_use]
    pub const fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// The `name=value` pair sent as `Cookie`.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Replace the cookie sent with later requests.
    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.cookie = Some(cookie.into());
    }

    fn store_cookie(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else {
                continue;
            };
            if !pair.starts_with("petal_session=") {
                continue;
            }
            let removed = value.to_ascii_lowercase().contains("max-age=0");
            self.cookie = if removed {
                None
            } else {
                Some(pair.trim().to_string())
            };
        }
    }
}
