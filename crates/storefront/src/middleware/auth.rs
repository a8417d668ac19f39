//! Authentication extractors.
//!
//! Handlers declare what they need in their signature: `RequireSession` for
//! any signed-in user, `RequireAdmin` for the shop owner, `OptionalSession`
//! where guests are welcome but a signed-in user changes the outcome.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tower_sessions::Session;

use petal_core::Role;

use crate::models::{SessionClaims, session_keys};

/// Extractor that requires a signed-in user of any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(RequireSession(claims): RequireSession) -> impl IntoResponse {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
pub struct RequireSession(pub SessionClaims);

/// Extractor that requires a signed-in admin.
pub struct RequireAdmin(pub SessionClaims);

/// Extractor that optionally gets the signed-in user.
pub struct OptionalSession(pub Option<SessionClaims>);

/// Rejection for the authentication extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No valid session.
    Unauthorized,
    /// Signed in, but the role is not allowed.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Check that `claims` exist and carry one of `allowed`.
///
/// # Errors
///
/// `Unauthorized` without claims, `Forbidden` for any other role.
pub fn authorize<'c>(
    claims: Option<&'c SessionClaims>,
    allowed: &[Role],
) -> Result<&'c SessionClaims, AuthRejection> {
    let claims = claims.ok_or(AuthRejection::Unauthorized)?;
    if allowed.contains(&claims.role) {
        Ok(claims)
    } else {
        Err(AuthRejection::Forbidden)
    }
}

/// Read unexpired claims from the request's session.
async fn current_claims(parts: &Parts) -> Option<SessionClaims> {
    let session = parts.extensions.get::<Session>()?;
    let claims: SessionClaims = session.get(session_keys::CLAIMS).await.ok().flatten()?;

    if claims.is_expired(Utc::now()) {
        tracing::debug!(user_id = %claims.sub, "Session claims expired");
        let _ = session.remove::<SessionClaims>(session_keys::CLAIMS).await;
        return None;
    }
    Some(claims)
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = current_claims(parts).await;
        authorize(claims.as_ref(), &[Role::Admin, Role::Customer])?;
        claims.map(Self).ok_or(AuthRejection::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = current_claims(parts).await;
        authorize(claims.as_ref(), &[Role::Admin])?;
        claims.map(Self).ok_or(AuthRejection::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_claims(parts).await))
    }
}

/// Store claims in the session after login or signup.
///
/// The session id is rotated first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_claims(
    session: &Session,
    claims: &SessionClaims,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CLAIMS, claims).await
}

/// Drop the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted from the store.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use petal_core::{Email, UserId};

    use super::*;

    fn claims(role: Role) -> SessionClaims {
        SessionClaims {
            sub: UserId::generate(),
            email: Email::parse("iris@petal.shop").unwrap(),
            role,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_authorize_roles() {
        let admin = claims(Role::Admin);
        let customer = claims(Role::Customer);

        assert_eq!(
            authorize(None, &[Role::Admin]).unwrap_err(),
            AuthRejection::Unauthorized
        );
        assert_eq!(
            authorize(Some(&customer), &[Role::Admin]).unwrap_err(),
            AuthRejection::Forbidden
        );
        assert!(authorize(Some(&admin), &[Role::Admin]).is_ok());
        assert!(authorize(Some(&customer), &[Role::Admin, Role::Customer]).is_ok());
    }

    #[test]
    fn test_rejection_status() {
        assert_eq!(
            AuthRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
