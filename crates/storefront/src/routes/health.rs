//! Health check.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub flowers: usize,
    pub orders: usize,
    /// Whether an AI backend is configured for chat.
    pub ai: bool,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let counts = state.store().counts().await;
    Json(HealthStatus {
        status: "ok",
        flowers: counts.flowers,
        orders: counts.orders,
        ai: state.claude().is_some(),
    })
}
