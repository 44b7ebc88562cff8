//! The [`ChatModel`] seam between orchestration and a concrete LLM provider.

use async_trait::async_trait;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  System,
  User,
  Assistant,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::System => "system",
      Self::User => "user",
      Self::Assistant => "assistant",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
  pub role:    Role,
  pub content: String,
}

impl PromptMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// One chat-completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
  pub messages:      Vec<PromptMessage>,
  /// Ask the provider to constrain its reply to a single JSON object.
  pub json_response: bool,
}

/// A language model that turns a conversation into one reply.
///
/// The trait is object safe so the server can hold an
/// `Arc<dyn ChatModel>` chosen at startup.
#[async_trait]
pub trait ChatModel: Send + Sync {
  /// Return the text of the model's reply. A reply without content is
  /// returned as an empty string.
  async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
