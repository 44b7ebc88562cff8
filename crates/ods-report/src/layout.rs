//! Report content as a flat list of styled blocks.

use chrono::{DateTime, Utc};
use ods_core::{
  dataset::Dataset, hierarchy::HierarchyRecord, id::ObjectId, object::ObjectRecord,
  relation::RelationRecord,
};

use crate::ReportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
  Title,
  Heading,
  Subheading,
  Body,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
  Text { style: Style, text: String },
  /// Vertical gap in points.
  Space(u16),
}

/// Accumulates blocks; keeps `compose` readable.
#[derive(Default)]
struct Sheet(Vec<Block>);

impl Sheet {
  fn text(&mut self, style: Style, text: impl Into<String>) {
    self.0.push(Block::Text { style, text: text.into() });
  }

  fn title(&mut self, text: impl Into<String>) { self.text(Style::Title, text) }
  fn heading(&mut self, text: impl Into<String>) { self.text(Style::Heading, text) }
  fn sub(&mut self, text: impl Into<String>) { self.text(Style::Subheading, text) }
  fn body(&mut self, text: impl Into<String>) { self.text(Style::Body, text) }
  fn bullet(&mut self, text: impl AsRef<str>) {
    self.text(Style::Body, format!("  - {}", text.as_ref()))
  }
  fn space(&mut self, pts: u16) { self.0.push(Block::Space(pts)) }
}

/// Build the blocks of a `kind` report.
pub fn compose(
  kind: ReportKind,
  dataset: &Dataset,
  generated_at: DateTime<Utc>,
) -> Vec<Block> {
  let mut sheet = Sheet::default();
  sheet.title(kind.title());
  sheet.body(format!(
    "Generated on: {}",
    generated_at.format("%Y-%m-%d %H:%M:%S UTC")
  ));
  sheet.space(30);

  match kind {
    ReportKind::Objects => objects_section(&mut sheet, &dataset.objects),
    ReportKind::Relations => relations_section(&mut sheet, dataset),
    ReportKind::Hierarchies => hierarchies_section(&mut sheet, dataset),
    ReportKind::Full => full_report(&mut sheet, dataset),
  }
  sheet.0
}

fn kind_of<'a>(dataset: &'a Dataset, id: &ObjectId) -> &'a str {
  dataset.object(id).map_or("Unknown", |o| o.kind.as_str())
}

fn relation_heading(dataset: &Dataset, index: usize, r: &RelationRecord) -> String {
  format!(
    "{index}. {} -> {}",
    dataset.object_name(&r.primary_object_id),
    r.relation_type.replace('_', " ")
  )
}

fn parent_heading(dataset: &Dataset, parent: Option<&ObjectId>) -> String {
  let name = parent.map_or("Root Level", |id| dataset.object_name(id));
  format!("Parent: {name}")
}

// ─── Single-collection reports ───────────────────────────────────────────────

fn objects_section(sheet: &mut Sheet, objects: &[ObjectRecord]) {
  if objects.is_empty() {
    sheet.body("No objects found.");
    return;
  }
  for (i, o) in objects.iter().enumerate() {
    sheet.heading(format!("{}. {}", i + 1, o.name));
    sheet.body(format!("Type: {}", o.kind));
    if !o.description.is_empty() {
      sheet.body(format!("Description: {}", o.description));
    }
    if !o.attributes.is_empty() {
      let attrs: Vec<_> = o.attributes.iter().map(|(k, v)| format!("{k}: {v}")).collect();
      sheet.body(format!("Attributes: {}", attrs.join(", ")));
    }
    if !o.tables.is_empty() {
      sheet.body("Tables:");
      for t in &o.tables {
        sheet.bullet(&t.name);
      }
    }
    sheet.space(20);
  }
}

fn relations_section(sheet: &mut Sheet, dataset: &Dataset) {
  if dataset.relations.is_empty() {
    sheet.body("No relations found.");
    return;
  }
  for (i, r) in dataset.relations.iter().enumerate() {
    sheet.heading(relation_heading(dataset, i + 1, r));
    if !r.secondary_object_ids.is_empty() {
      sheet.body("Related Objects:");
      for id in &r.secondary_object_ids {
        sheet.bullet(format!(
          "{} ({})",
          dataset.object_name(id),
          kind_of(dataset, id)
        ));
      }
    }
    if let Some(desc) = r.description.as_deref().filter(|d| !d.is_empty()) {
      sheet.body(format!("Description: {desc}"));
    }
    sheet.space(20);
  }
}

fn hierarchy_children(sheet: &mut Sheet, dataset: &Dataset, h: &HierarchyRecord) {
  if h.child_object_ids.is_empty() {
    return;
  }
  // Root-level (0) groupings are labelled as the first level.
  let level = if h.level == 0 { 1 } else { h.level };
  sheet.body(format!("Level {level} Children:"));
  for id in &h.child_object_ids {
    sheet.bullet(format!("{} ({})", dataset.object_name(id), kind_of(dataset, id)));
  }
}

fn hierarchies_section(sheet: &mut Sheet, dataset: &Dataset) {
  if dataset.hierarchies.is_empty() {
    sheet.body("No hierarchies found.");
    return;
  }
  for (parent, group) in dataset.hierarchies_by_parent() {
    sheet.heading(parent_heading(dataset, parent));
    for h in group {
      hierarchy_children(sheet, dataset, h);
    }
    sheet.space(20);
  }
}

// ─── Complete report ─────────────────────────────────────────────────────────

fn full_report(sheet: &mut Sheet, dataset: &Dataset) {
  sheet.heading("OBJECTS");
  if dataset.objects.is_empty() {
    sheet.body("No objects found.");
  }
  for (i, o) in dataset.objects.iter().enumerate() {
    sheet.sub(format!("{}. {} ({})", i + 1, o.name, o.kind));
    if !o.description.is_empty() {
      sheet.body(format!("Description: {}", o.description));
    }
    sheet.space(10);
  }
  sheet.space(30);

  sheet.heading("RELATIONS");
  if dataset.relations.is_empty() {
    sheet.body("No relations found.");
  }
  for (i, r) in dataset.relations.iter().enumerate() {
    sheet.sub(relation_heading(dataset, i + 1, r));
    if let Some(desc) = r.description.as_deref().filter(|d| !d.is_empty()) {
      sheet.body(format!("Description: {desc}"));
    }
    sheet.space(10);
  }
  sheet.space(30);

  sheet.heading("HIERARCHIES");
  if dataset.hierarchies.is_empty() {
    sheet.body("No hierarchies found.");
  }
  for (parent, group) in dataset.hierarchies_by_parent() {
    sheet.sub(parent_heading(dataset, parent));
    for id in group.iter().flat_map(|h| &h.child_object_ids) {
      sheet.bullet(dataset.object_name(id));
    }
    sheet.space(10);
  }

  sheet.space(30);
  sheet.body("Generated by Object Design System");
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use ods_core::hierarchy::HierarchyRecord;

  use super::*;

  fn texts(blocks: &[Block]) -> Vec<&str> {
    blocks
      .iter()
      .filter_map(|b| match b {
        Block::Text { text, .. } => Some(text.as_str()),
        Block::Space(_) => None,
      })
      .collect()
  }

  fn at() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap() }

  #[test]
  fn every_report_opens_with_title_and_timestamp() {
    for kind in [
      ReportKind::Objects,
      ReportKind::Relations,
      ReportKind::Hierarchies,
      ReportKind::Full,
    ] {
      let blocks = compose(kind, &Dataset::default(), at());
      assert_eq!(
        blocks[0],
        Block::Text { style: Style::Title, text: kind.title().to_owned() }
      );
      assert_eq!(texts(&blocks)[1], "Generated on: 2024-05-01 12:30:00 UTC");
    }
  }

  #[test]
  fn objects_report_lists_type_attributes_and_tables() {
    let blocks = compose(ReportKind::Objects, &Dataset::sample(), at());
    let lines = texts(&blocks);
    assert!(lines.contains(&"1. User Management System"));
    assert!(lines.contains(&"Type: Item"));
    assert!(lines.contains(&"Tables:"));
    assert!(lines.contains(&"  - User Permissions"));
    assert!(lines.iter().any(|l| l.starts_with("Attributes: ")));
  }

  #[test]
  fn relations_report_names_endpoints() {
    let blocks = compose(ReportKind::Relations, &Dataset::sample(), at());
    let lines = texts(&blocks);
    assert!(lines.contains(&"1. User Management System -> Item-to-Document"));
    assert!(lines.contains(&"  - Product Catalog (Document)"));
  }

  #[test]
  fn underscores_in_relation_type_become_spaces() {
    let mut ds = Dataset::sample();
    ds.relations[0].relation_type = "depends_on".into();
    let blocks = compose(ReportKind::Relations, &ds, at());
    assert!(texts(&blocks).contains(&"1. User Management System -> depends on"));
  }

  #[test]
  fn dangling_children_render_as_unknown() {
    let blocks = compose(ReportKind::Hierarchies, &Dataset::sample(), at());
    let lines = texts(&blocks);
    assert!(lines.contains(&"Parent: User Management System"));
    assert!(lines.contains(&"  - Unknown (Unknown)"));
  }

  #[test]
  fn parentless_hierarchies_group_under_root_level() {
    let mut ds = Dataset::default();
    ds.hierarchies.push(HierarchyRecord {
      id:               "h".into(),
      parent_object_id: None,
      child_object_ids: vec!["x".into()],
      level:            0,
      properties:       Default::default(),
    });
    let blocks = compose(ReportKind::Hierarchies, &ds, at());
    let lines = texts(&blocks);
    assert!(lines.contains(&"Parent: Root Level"));
    assert!(lines.contains(&"Level 1 Children:"));
    assert!(!lines.contains(&"Level 0 Children:"));
  }

  #[test]
  fn nonzero_levels_are_printed_as_is() {
    let mut ds = Dataset::sample();
    ds.hierarchies[0].level = 3;
    let blocks = compose(ReportKind::Hierarchies, &ds, at());
    assert!(texts(&blocks).contains(&"Level 3 Children:"));
  }

  #[test]
  fn empty_collections_say_so() {
    let blocks = compose(ReportKind::Full, &Dataset::default(), at());
    let lines = texts(&blocks);
    assert!(lines.contains(&"No objects found."));
    assert!(lines.contains(&"No relations found."));
    assert!(lines.contains(&"No hierarchies found."));
    assert_eq!(lines.last(), Some(&"Generated by Object Design System"));
  }
}
