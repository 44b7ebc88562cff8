//! Chat sessions: the stored conversation history behind `/chat`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::id::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Assistant,
}

impl ChatRole {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Assistant => "assistant",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id:        String,
  pub role:      ChatRole,
  pub content:   String,
  pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
  /// A new message with an id of the form `<uuid>-<role>`.
  pub fn new(role: ChatRole, content: impl Into<String>, at: DateTime<Utc>) -> Self {
    Self {
      id:        format!("{}-{}", Uuid::new_v4(), role.as_str()),
      role,
      content:   content.into(),
      timestamp: at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSessionRecord {
  pub id:           SessionId,
  /// Oldest first.
  pub messages:     Vec<ChatMessage>,
  pub created_date: DateTime<Utc>,
}

impl ChatSessionRecord {
  pub fn create(input: NewChatSession, now: DateTime<Utc>) -> Self {
    Self {
      id:           SessionId::generate(),
      messages:     input.messages,
      created_date: now,
    }
  }

  pub fn apply(&mut self, patch: ChatSessionPatch) {
    if let Some(messages) = patch.messages {
      self.messages = messages;
    }
  }
}

/// Input to [`crate::store::EntityStore::create_chat_session`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewChatSession {
  #[serde(default)]
  pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ChatSessionPatch {
  pub messages: Option<Vec<ChatMessage>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_ids_carry_the_role_suffix() {
    let now = Utc::now();
    let user = ChatMessage::new(ChatRole::User, "hi", now);
    let bot = ChatMessage::new(ChatRole::Assistant, "hello", now);
    assert!(user.id.ends_with("-user"));
    assert!(bot.id.ends_with("-assistant"));
    assert_ne!(user.id, bot.id);
  }

  #[test]
  fn roles_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
  }
}
