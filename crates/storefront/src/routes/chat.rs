//! Shop assistant endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::error::Result;
use crate::models::{ChatReply, ChatRequest};
use crate::services::ChatService;
use crate::state::AppState;

/// `POST /chat`
pub async fn reply(
    State(state): State<AppState>,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>> {
    let Json(request) = body?;
    let chat = ChatService::new(state.store(), state.claude(), &state.config().contact);
    Ok(Json(chat.reply(request).await?))
}
