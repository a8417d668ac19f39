//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Health check with store counts
//!
//! # Catalog
//! GET    /flowers             - List (occasion, q, inStock filters)
//! GET    /flowers/{id}        - Detail
//! POST   /flowers             - Create (admin)
//! PATCH  /flowers/{id}        - Partial update (admin)
//! DELETE /flowers/{id}        - Delete (admin)
//!
//! # Orders
//! POST   /orders              - Checkout (guest or signed in)
//! GET    /orders              - All orders (admin) or own orders (customer)
//! GET    /orders/{id}         - Detail (admin or owner)
//! PATCH  /orders/{id}         - Payment status (admin)
//!
//! # Auth
//! POST   /auth/login          - Password login
//! POST   /auth/signup         - Customer signup
//! POST   /auth/logout         - Drop the session
//! GET    /auth/me             - Current user
//!
//! # Chat
//! POST   /chat                - Shop assistant reply
//! ```
//!
//! Anything else is served from `STOREFRONT_STATIC_DIR` when it is set, and
//! answered with a JSON 404 otherwise.

pub mod auth;
pub mod chat;
pub mod flowers;
pub mod health;
pub mod orders;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode, header::CONTENT_TYPE},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower::util::option_layer;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn flower_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(flowers::index).post(flowers::create))
        .route(
            "/{id}",
            get(flowers::show)
                .patch(flowers::update)
                .delete(flowers::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show).patch(orders::update))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::reply))
        .nest("/flowers", flower_routes())
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let session_layer = create_session_layer(config);
    let cors_layer = config.cors_origin.as_deref().and_then(cors_layer);
    let static_dir = config.static_dir.clone();

    let mut router = routes();
    router = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static files");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router.fallback(not_found),
    };

    router
        .layer(session_layer)
        .layer(option_layer(cors_layer))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for a frontend served from another origin. Cookies are allowed.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let Ok(origin) = HeaderValue::from_str(origin) else {
        tracing::warn!(origin, "Ignoring invalid STOREFRONT_CORS_ORIGIN");
        return None;
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true),
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
