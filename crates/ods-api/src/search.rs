//! `POST /search`: LLM-ranked object search.

use axum::{Json, extract::State};
use ods_ai::{SearchRequest, SearchResponse};
use ods_core::store::EntityStore;

use crate::{AppState, error::ApiError, extract::ValidJson};

/// `POST /search` with body `{"query":"..."}`
pub async fn handler<S: EntityStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
  let model = state.model()?;
  let response = ods_ai::search(state.store.as_ref(), model, &body.query)
    .await
    .map_err(ApiError::upstream("search failed"))?;
  Ok(Json(response))
}
