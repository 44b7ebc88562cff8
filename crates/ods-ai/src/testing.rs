//! Test doubles.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ChatModel, CompletionRequest, Error, Result};

/// Replies with a fixed string and remembers every request it saw.
pub struct Canned {
  reply: Option<String>,
  pub seen: Mutex<Vec<CompletionRequest>>,
}

impl Canned {
  pub fn new(reply: impl Into<String>) -> Self {
    Self { reply: Some(reply.into()), seen: Mutex::new(Vec::new()) }
  }

  /// A model whose every call fails.
  pub fn failing() -> Self { Self { reply: None, seen: Mutex::new(Vec::new()) } }

  pub fn last_prompt(&self) -> String {
    let seen = self.seen.lock().unwrap();
    let last = seen.last().expect("no request recorded");
    last.messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join("\n")
  }
}

#[async_trait]
impl ChatModel for Canned {
  async fn complete(&self, request: CompletionRequest) -> Result<String> {
    self.seen.lock().unwrap().push(request);
    self.reply.clone().ok_or_else(|| Error::Api {
      status: 500,
      body:   "model unavailable".into(),
    })
  }
}
