//! Error types for `ods-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown object type: {0:?}")]
  UnknownObjectKind(String),

  #[error("validation failed: {0}")]
  Validation(#[from] validator::ValidationErrors),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
