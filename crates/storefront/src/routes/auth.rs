//! Authentication route handlers.
//!
//! Password login and signup for the JSON API. A successful login or signup
//! rotates the session id and stores [`SessionClaims`] under a signed cookie.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireSession, clear_session, set_claims};
use crate::models::{SessionClaims, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// `POST /auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let Json(form) = body?;
    let user = AuthService::new(state.store())
        .login(&form.email, form.password.expose_secret())
        .await?;

    sign_in(&state, &session, &user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(Json(user))
}

/// `POST /auth/signup`
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let Json(form) = body?;
    let user = AuthService::new(state.store())
        .signup(&form.name, &form.email, form.password.expose_secret())
        .await?;

    sign_in(&state, &session, &user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/logout`; succeeds with or without a session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_session(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireSession(claims): RequireSession,
) -> Result<Json<User>> {
    let user = AuthService::new(state.store())
        .get_user(claims.sub)
        .await
        .map_err(|_| AppError::Unauthorized("Session user no longer exists".to_string()))?;
    Ok(Json(user))
}

async fn sign_in(state: &AppState, session: &Session, user: &User) -> Result<()> {
    let ttl = Duration::hours(state.config().session_ttl_hours);
    let claims = SessionClaims::issue(user, Utc::now(), ttl);
    set_claims(session, &claims).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}
