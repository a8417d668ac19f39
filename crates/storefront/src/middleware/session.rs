//! Session middleware configuration.
//!
//! Sessions live in process memory and the cookie is signed with a key derived
//! from `STOREFRONT_SESSION_SECRET`, so a restart logs everyone out.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer, cookie::Key, service::SignedCookie,
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "petal_session";

/// Session layer type used by the router.
pub type StorefrontSessionLayer = SessionManagerLayer<MemoryStore, SignedCookie>;

/// Create the signed, in-memory session layer.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> StorefrontSessionLayer {
    let key = signing_key(config.session_secret.expose_secret());

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(config.session_ttl_hours),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

/// Stretch the configured secret to the 64 bytes a cookie key needs.
fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
