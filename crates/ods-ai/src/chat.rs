//! Conversational assistant backed by stored chat sessions.

use chrono::Utc;
use ods_core::{
  chat::{ChatMessage, ChatRole, ChatSessionPatch, ChatSessionRecord, NewChatSession},
  id::SessionId,
  object::ObjectRecord,
  store::EntityStore,
  validate::not_blank,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  Error, Result,
  model::{ChatModel, CompletionRequest, PromptMessage},
};

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for an Object \
                             Design System. Provide clear, informative \
                             responses about objects, their properties, \
                             relationships, and hierarchies.";

const EMPTY_REPLY: &str = "I couldn't generate a response.";

/// Body of `POST /chat`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
  #[validate(custom(function = "not_blank"))]
  pub message:    String,
  pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
  pub message:    String,
  pub session_id: SessionId,
}

pub fn build_chat_prompt(
  objects: &[ObjectRecord],
  history: &[ChatMessage],
  message: &str,
) -> Result<String> {
  let objects = serde_json::to_string_pretty(objects)?;
  let history = serde_json::to_string_pretty(history)?;

  Ok(format!(
    "You are an AI assistant for an Object Design System. Help users with \
     questions about objects, their relationships, and hierarchies.\n\n\
     Available objects:\n{objects}\n\n\
     Previous conversation:\n{history}\n\n\
     Current user message: {message:?}\n\n\
     Provide a helpful response about the objects or system. If the user is \
     asking about specific objects, reference them by name and provide \
     details."
  ))
}

async fn open_session<S: EntityStore>(
  store: &S,
  session_id: Option<&SessionId>,
) -> Result<ChatSessionRecord> {
  if let Some(id) = session_id {
    if let Some(session) = store.get_chat_session(id).await.map_err(Error::store)? {
      return Ok(session);
    }
    tracing::debug!(session = %id, "unknown chat session, starting a new one");
  }
  let session = store
    .create_chat_session(NewChatSession::default())
    .await
    .map_err(Error::store)?;
  tracing::debug!(session = %session.id, "started chat session");
  Ok(session)
}

/// Answer `message` in the context of the session named by `session_id`.
///
/// An absent or unknown session id starts a new session. The user message
/// and the reply are appended to the session before returning.
pub async fn chat<S: EntityStore>(
  store: &S,
  model: &dyn ChatModel,
  message: &str,
  session_id: Option<&SessionId>,
) -> Result<ChatReply> {
  let session = open_session(store, session_id).await?;
  let objects = store.list_objects().await.map_err(Error::store)?;

  let prompt = build_chat_prompt(&objects, &session.messages, message)?;
  let reply = model
    .complete(CompletionRequest {
      messages:      vec![
        PromptMessage::system(SYSTEM_PROMPT),
        PromptMessage::user(prompt),
      ],
      json_response: false,
    })
    .await?;
  let reply = if reply.trim().is_empty() { EMPTY_REPLY.to_owned() } else { reply };

  let now = Utc::now();
  let mut messages = session.messages;
  messages.push(ChatMessage::new(ChatRole::User, message, now));
  messages.push(ChatMessage::new(ChatRole::Assistant, reply.clone(), now));

  let updated = store
    .update_chat_session(&session.id, ChatSessionPatch { messages: Some(messages.clone()) })
    .await
    .map_err(Error::store)?;
  let session_id = match updated {
    Some(session) => session.id,
    None => {
      tracing::warn!(session = %session.id, "chat session vanished mid-request, saving as new");
      store
        .create_chat_session(NewChatSession { messages })
        .await
        .map_err(Error::store)?
        .id
    }
  };

  tracing::info!(session = %session_id, "chat reply sent");
  Ok(ChatReply { message: reply, session_id })
}
