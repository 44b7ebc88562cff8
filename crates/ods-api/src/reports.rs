//! `GET /reports/{kind}`: PDF report download.

use axum::{
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use chrono::Utc;
use ods_core::store::EntityStore;
use ods_report::ReportKind;

use crate::{AppState, error::ApiError};

/// `GET /reports/{kind}`: `kind` is one of `objects`, `relations`,
/// `hierarchies`, `full`.
pub async fn download<S: EntityStore>(
  State(state): State<AppState<S>>,
  Path(kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let kind: ReportKind = kind
    .parse()
    .map_err(|e: ods_report::Error| ApiError::BadRequest(e.to_string()))?;

  let dataset = state.store.snapshot().await.map_err(ApiError::store)?;
  let now = Utc::now();

  let pdf = tokio::task::spawn_blocking(move || ods_report::render(kind, &dataset, now))
    .await
    .map_err(ApiError::upstream("report generation failed"))?
    .map_err(ApiError::upstream("report generation failed"))?;

  let disposition = format!(
    "attachment; filename=\"{}\"",
    ods_report::filename(kind, now.date_naive())
  );
  tracing::info!(%kind, bytes = pdf.len(), "report generated");
  Ok((
    [
      (header::CONTENT_TYPE, "application/pdf".to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    pdf,
  ))
}
