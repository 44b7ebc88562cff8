//! Handlers for `/chat` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/chat` | Body: `{"message":"...","sessionId":"..."?}` |
//! | `GET`  | `/chat/{id}` | Full session history; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use ods_ai::{ChatReply, ChatRequest};
use ods_core::{chat::ChatSessionRecord, id::SessionId, store::EntityStore};

use crate::{AppState, error::ApiError, extract::ValidJson};

/// `POST /chat`
pub async fn send<S: EntityStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
  let model = state.model()?;
  let reply = ods_ai::chat(
    state.store.as_ref(),
    model,
    &body.message,
    body.session_id.as_ref(),
  )
  .await
  .map_err(ApiError::upstream("chat failed"))?;
  Ok(Json(reply))
}

/// `GET /chat/{id}`
pub async fn get_session<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<SessionId>,
) -> Result<Json<ChatSessionRecord>, ApiError> {
  let session = state
    .store
    .get_chat_session(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("chat session {id} not found")))?;
  Ok(Json(session))
}
