//! Shop assistant chat.
//!
//! Replies come from the Claude API when a key is configured. Any failure
//! there (timeout, HTTP error, empty reply) drops to the keyword rules in
//! [`replies`], so the endpoint always answers.

pub mod replies;

use askama::Template;
use thiserror::Error;
use tracing::instrument;

use petal_core::Occasion;

use crate::claude::{ClaudeClient, ClaudeError, Message};
use crate::config::ShopContact;
use crate::db::{CatalogStore, FlowerRepository};
use crate::models::{ChatReply, ChatRequest, ChatTurn, Flower, ReplySource, TurnRole};

/// Longest accepted message, and the cap applied to each history turn.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Number of trailing history turns forwarded to the model.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Errors from chat requests.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message must be at most {max} characters")]
    MessageTooLong { max: usize },
}

/// System prompt with a snapshot of the catalog.
#[derive(Template)]
#[template(path = "chat/system_prompt.txt")]
struct SystemPromptTemplate<'a> {
    flowers: Vec<CatalogLine<'a>>,
    occasions: String,
    contact: &'a ShopContact,
}

struct CatalogLine<'a> {
    name: &'a str,
    price: String,
    occasion: &'static str,
    stock: u32,
}

/// Chat service.
pub struct ChatService<'a> {
    flowers: FlowerRepository<'a>,
    claude: Option<&'a ClaudeClient>,
    contact: &'a ShopContact,
}

impl<'a> ChatService<'a> {
    #[must_use]
    pub const fn new(
        store: &'a CatalogStore,
        claude: Option<&'a ClaudeClient>,
        contact: &'a ShopContact,
    ) -> Self {
        Self {
            flowers: FlowerRepository::new(store),
            claude,
            contact,
        }
    }

    /// Answer a customer message.
    ///
    /// # Errors
    ///
    /// Returns `ChatError` if the message is blank or too long. Upstream
    /// failures never surface; they produce a local reply instead.
    #[instrument(skip(self, request), fields(history = request.history.len()))]
    pub async fn reply(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let message = validate_message(&request.message)?;
        let flowers = self.flowers.all().await;

        if let Some(client) = self.claude {
            match render_system_prompt(&flowers, self.contact) {
                Ok(system) => match ask_claude(client, system, message, &request.history).await {
                    Ok(reply) => {
                        return Ok(ChatReply {
                            reply,
                            source: ReplySource::Ai,
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "Claude reply failed, using local reply"),
                },
                Err(e) => tracing::error!(error = %e, "Failed to render chat system prompt"),
            }
        }

        Ok(ChatReply {
            reply: replies::local_reply(message, &flowers, self.contact),
            source: ReplySource::Local,
        })
    }
}

async fn ask_claude(
    client: &ClaudeClient,
    system: String,
    message: &str,
    history: &[ChatTurn],
) -> Result<String, ClaudeError> {
    let mut messages = trim_history(history);
    messages.push(Message::user(message));

    tokio::time::timeout(client.timeout(), client.complete(messages, Some(system)))
        .await
        .map_err(|_| ClaudeError::Timeout(client.timeout().as_secs()))?
}

fn validate_message(raw: &str) -> Result<&str, ChatError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::MessageTooLong {
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(message)
}

/// Keep the last turns, cap their length and start on a user turn.
fn trim_history(history: &[ChatTurn]) -> Vec<Message> {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    history
        .iter()
        .skip(start)
        .skip_while(|turn| turn.role == TurnRole::Assistant)
        .filter(|turn| !turn.content.trim().is_empty())
        .map(|turn| {
            let content: String = turn.content.chars().take(MAX_MESSAGE_CHARS).collect();
            match turn.role {
                TurnRole::User => Message::user(content),
                TurnRole::Assistant => Message::assistant(content),
            }
        })
        .collect()
}

fn render_system_prompt(flowers: &[Flower], contact: &ShopContact) -> Result<String, askama::Error> {
    SystemPromptTemplate {
        flowers: flowers
            .iter()
            .map(|f| CatalogLine {
                name: &f.name,
                price: format!("{:.2}", f.price),
                occasion: f.occasion.as_str(),
                stock: f.stock,
            })
            .collect(),
        occasions: Occasion::names().join(", "),
        contact,
    }
    .render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::config::ClaudeConfig;
    use crate::db::seed::seed_catalog;

    fn turn(role: TurnRole, content: &str) -> ChatTurn {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_validate_message() {
        assert!(matches!(validate_message("   "), Err(ChatError::EmptyMessage)));
        assert!(matches!(
            validate_message(&"a".repeat(MAX_MESSAGE_CHARS + 1)),
            Err(ChatError::MessageTooLong { .. })
        ));
        assert_eq!(validate_message("  hello ").unwrap(), "hello");
    }

    #[test]
    fn test_trim_history_keeps_last_turns() {
        let history: Vec<ChatTurn> = (0..15)
            .map(|i| {
                let role = if i % 2 == 0 {
                    TurnRole::User
                } else {
                    TurnRole::Assistant
                };
                turn(role, &format!("turn {i}"))
            })
            .collect();

        let messages = trim_history(&history);
        // Turns 5..15 survive; turn 5 is an assistant turn and is dropped.
        assert_eq!(messages.len(), 9);
        assert_eq!(messages.first().unwrap().role, "user");
        assert_eq!(messages.first().unwrap().content, "turn 6");
    }

    #[test]
    fn test_trim_history_truncates_content() {
        let long = "x".repeat(MAX_MESSAGE_CHARS * 2);
        let messages = trim_history(&[turn(TurnRole::User, &long)]);
        assert_eq!(messages.first().unwrap().content.len(), MAX_MESSAGE_CHARS);
    }

    #[tokio::test]
    async fn test_system_prompt_lists_catalog() {
        let store = CatalogStore::new();
        seed_catalog(&store).await;
        let flowers = FlowerRepository::new(&store).all().await;

        let prompt = render_system_prompt(&flowers, &ShopContact::default()).unwrap();
        assert!(prompt.contains("Crimson Rose Bouquet"));
        assert!(prompt.contains("54.99"));
        assert!(prompt.contains("sold out"));
        assert!(prompt.contains("hello@petal.shop"));
    }

    #[tokio::test]
    async fn test_reply_without_client_is_local() {
        let store = CatalogStore::new();
        seed_catalog(&store).await;
        let contact = ShopContact::default();
        let chat = ChatService::new(&store, None, &contact);

        let reply = chat
            .reply(ChatRequest {
                message: "what are your prices".to_string(),
                history: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(reply.source, ReplySource::Local);
        assert!(reply.reply.contains("price"));
    }

    #[tokio::test]
    async fn test_reply_falls_back_when_upstream_unreachable() {
        let store = CatalogStore::new();
        let contact = ShopContact::default();
        let client = ClaudeClient::new(&ClaudeConfig {
            api_key: SecretString::from("sk-ant-test"),
            model: "test-model".to_string(),
            api_url: "http://127.0.0.1:9/v1/messages".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let chat = ChatService::new(&store, Some(&client), &contact);

        let reply = chat
            .reply(ChatRequest {
                message: "hello".to_string(),
                history: vec![turn(TurnRole::Assistant, "Welcome!")],
            })
            .await
            .unwrap();
        assert_eq!(reply.source, ReplySource::Local);
    }
}
