//! PDF reports over a [`Dataset`] snapshot.
//!
//! Rendering is two-step: [`layout::compose`] turns the dataset into styled
//! blocks, and [`pdf::write`] paginates those blocks into an A4 document.
//! Both steps are synchronous and CPU-bound; async callers should run
//! [`render`] on a blocking thread.

pub mod error;
pub mod kind;
pub mod layout;
pub mod pdf;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use ods_core::dataset::Dataset;

pub use error::{Error, Result};
pub use kind::ReportKind;

/// Render the report of `kind` for `dataset` as PDF bytes.
pub fn render(
  kind: ReportKind,
  dataset: &Dataset,
  generated_at: DateTime<Utc>,
) -> Result<Bytes> {
  let blocks = layout::compose(kind, dataset, generated_at);
  let pdf = pdf::write(&blocks, kind.title())?;
  tracing::debug!(kind = %kind, bytes = pdf.len(), "rendered report");
  Ok(Bytes::from(pdf))
}

/// Download name: `object-design-<kind>-report-<YYYY-MM-DD>.pdf`.
pub fn filename(kind: ReportKind, date: NaiveDate) -> String {
  format!("object-design-{kind}-report-{}.pdf", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_full_report_is_a_loadable_pdf() {
    let bytes = render(ReportKind::Full, &Dataset::sample(), Utc::now()).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert!(!doc.get_pages().is_empty());
  }

  #[test]
  fn filename_carries_kind_and_date() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(
      filename(ReportKind::Relations, date),
      "object-design-relations-report-2024-03-09.pdf"
    );
  }
}
