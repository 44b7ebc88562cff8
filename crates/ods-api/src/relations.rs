//! Handlers for `/relations` endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ods_core::{
  id::RelationId,
  relation::{NewRelation, RelationPatch, RelationRecord},
  store::EntityStore,
};

use crate::{AppState, error::ApiError, extract::ValidJson};

fn not_found(id: &RelationId) -> ApiError {
  ApiError::NotFound(format!("relation {id} not found"))
}

/// `GET /relations`
pub async fn list<S: EntityStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<RelationRecord>>, ApiError> {
  let relations = state.store.list_relations().await.map_err(ApiError::store)?;
  Ok(Json(relations))
}

/// `POST /relations`: referenced objects need not exist.
pub async fn create<S: EntityStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<NewRelation>,
) -> Result<impl IntoResponse, ApiError> {
  let relation = state
    .store
    .create_relation(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %relation.id, kind = %relation.relation_type, "relation created");
  Ok((StatusCode::CREATED, Json(relation)))
}

/// `GET /relations/{id}`
pub async fn get_one<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<RelationId>,
) -> Result<Json<RelationRecord>, ApiError> {
  let relation = state
    .store
    .get_relation(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(relation))
}

/// `PUT /relations/{id}`
pub async fn update<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<RelationId>,
  ValidJson(patch): ValidJson<RelationPatch>,
) -> Result<Json<RelationRecord>, ApiError> {
  let relation = state
    .store
    .update_relation(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(relation))
}

/// `DELETE /relations/{id}`
pub async fn delete<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<RelationId>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_relation(&id).await.map_err(ApiError::store)? {
    return Err(not_found(&id));
  }
  tracing::info!(%id, "relation deleted");
  Ok(StatusCode::NO_CONTENT)
}
