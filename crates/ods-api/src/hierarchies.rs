//! Handlers for `/hierarchies` endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ods_core::{
  hierarchy::{HierarchyPatch, HierarchyRecord, NewHierarchy},
  id::HierarchyId,
  store::EntityStore,
};

use crate::{AppState, error::ApiError, extract::ValidJson};

fn not_found(id: &HierarchyId) -> ApiError {
  ApiError::NotFound(format!("hierarchy {id} not found"))
}

/// `GET /hierarchies`
pub async fn list<S: EntityStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<HierarchyRecord>>, ApiError> {
  let hierarchies = state
    .store
    .list_hierarchies()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(hierarchies))
}

/// `POST /hierarchies`
pub async fn create<S: EntityStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<NewHierarchy>,
) -> Result<impl IntoResponse, ApiError> {
  let hierarchy = state
    .store
    .create_hierarchy(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %hierarchy.id, level = hierarchy.level, "hierarchy created");
  Ok((StatusCode::CREATED, Json(hierarchy)))
}

/// `GET /hierarchies/{id}`
pub async fn get_one<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<HierarchyId>,
) -> Result<Json<HierarchyRecord>, ApiError> {
  let hierarchy = state
    .store
    .get_hierarchy(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(hierarchy))
}

/// `PUT /hierarchies/{id}`
pub async fn update<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<HierarchyId>,
  ValidJson(patch): ValidJson<HierarchyPatch>,
) -> Result<Json<HierarchyRecord>, ApiError> {
  let hierarchy = state
    .store
    .update_hierarchy(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(hierarchy))
}

/// `DELETE /hierarchies/{id}`
pub async fn delete<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<HierarchyId>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_hierarchy(&id).await.map_err(ApiError::store)? {
    return Err(not_found(&id));
  }
  tracing::info!(%id, "hierarchy deleted");
  Ok(StatusCode::NO_CONTENT)
}
