//! Handlers for `/objects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/objects` | Insertion order |
//! | `POST`   | `/objects` | Body: [`NewObject`]; 201 |
//! | `GET`    | `/objects/{id}` | 404 if not found |
//! | `PUT`    | `/objects/{id}` | Body: [`ObjectPatch`]; partial |
//! | `DELETE` | `/objects/{id}` | 204; relations and hierarchies are kept |
//! | `GET`    | `/objects/{id}/relations` | Membership query |
//! | `GET`    | `/objects/{id}/hierarchy` | Membership query |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ods_core::{
  hierarchy::HierarchyRecord,
  id::ObjectId,
  object::{NewObject, ObjectPatch, ObjectRecord},
  relation::RelationRecord,
  store::EntityStore,
};

use crate::{AppState, error::ApiError, extract::ValidJson};

fn not_found(id: &ObjectId) -> ApiError {
  ApiError::NotFound(format!("object {id} not found"))
}

/// `GET /objects`
pub async fn list<S: EntityStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ObjectRecord>>, ApiError> {
  let objects = state.store.list_objects().await.map_err(ApiError::store)?;
  Ok(Json(objects))
}

/// `POST /objects`
pub async fn create<S: EntityStore>(
  State(state): State<AppState<S>>,
  ValidJson(body): ValidJson<NewObject>,
) -> Result<impl IntoResponse, ApiError> {
  let object = state.store.create_object(body).await.map_err(ApiError::store)?;
  tracing::info!(id = %object.id, name = %object.name, "object created");
  Ok((StatusCode::CREATED, Json(object)))
}

/// `GET /objects/{id}`
pub async fn get_one<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<ObjectId>,
) -> Result<Json<ObjectRecord>, ApiError> {
  let object = state
    .store
    .get_object(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(object))
}

/// `PUT /objects/{id}`
pub async fn update<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<ObjectId>,
  ValidJson(patch): ValidJson<ObjectPatch>,
) -> Result<Json<ObjectRecord>, ApiError> {
  let object = state
    .store
    .update_object(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  tracing::info!(%id, revision = object.revision, "object updated");
  Ok(Json(object))
}

/// `DELETE /objects/{id}`
pub async fn delete<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<ObjectId>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_object(&id).await.map_err(ApiError::store)? {
    return Err(not_found(&id));
  }
  tracing::info!(%id, "object deleted");
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /objects/{id}/relations`
pub async fn relations<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<ObjectId>,
) -> Result<Json<Vec<RelationRecord>>, ApiError> {
  let relations = state
    .store
    .object_relations(&id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(relations))
}

/// `GET /objects/{id}/hierarchy`
pub async fn hierarchies<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<ObjectId>,
) -> Result<Json<Vec<HierarchyRecord>>, ApiError> {
  let hierarchies = state
    .store
    .object_hierarchies(&id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(hierarchies))
}
