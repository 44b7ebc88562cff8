//! [`ValidJson`]: a JSON body extractor that also runs `validator` rules.

use axum::{
  Json,
  extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// Like [`Json`], but rejects payloads that fail their [`Validate`] rules.
/// Both syntax errors and rule violations become 400 responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Validate,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|e: JsonRejection| ApiError::BadRequest(e.body_text()))?;
    let value = ods_core::validate::validated(value)
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Self(value))
  }
}
