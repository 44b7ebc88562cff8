//! LLM-backed search and chat for the Object Design System.
//!
//! The crate talks to a language model only through the [`ChatModel`] trait.
//! [`OpenAiClient`] is the production implementation; tests substitute a
//! canned model.

pub mod chat;
pub mod error;
pub mod model;
pub mod openai;
pub mod search;

pub use chat::{ChatReply, ChatRequest, chat};
pub use error::{Error, Result};
pub use model::{ChatModel, CompletionRequest, PromptMessage, Role};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use search::{SearchHit, SearchRequest, SearchResponse, search};

#[cfg(test)]
pub(crate) mod testing;
