//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (record in span, echo in response)
//! 4. Security headers
//! 5. CORS (only when `STOREFRONT_CORS_ORIGIN` is set)
//! 6. Session layer (signed cookie, in-memory store)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, OptionalSession, RequireAdmin, RequireSession, authorize, clear_session,
    set_claims,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, StorefrontSessionLayer, create_session_layer};
