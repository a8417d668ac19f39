//! Anthropic Messages API client used by the chat assistant.
//!
//! Only the non-streaming text completion path is needed: the chat service
//! sends a system prompt plus recent history and reads back the text blocks.

mod client;
mod error;
mod types;

pub use client::ClaudeClient;
pub use error::{ApiError, ApiErrorResponse, ClaudeError};
pub use types::{ChatRequest, ChatResponse, ContentBlock, Message, StopReason, Usage};
