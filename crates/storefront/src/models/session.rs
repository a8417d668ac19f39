//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use petal_core::{Email, Role, UserId};

use super::User;

/// Identity stored in the signed session.
///
/// `expires_at` is absolute: a session stops authenticating once it passes,
/// however recently the cookie was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id).
    pub sub: UserId,
    pub email: Email,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Claims for `user` valid for `ttl` from `now`.
    #[must_use]
    pub fn issue(user: &User, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the signed-in user's claims.
    pub const CLAIMS: &str = "claims";
}
