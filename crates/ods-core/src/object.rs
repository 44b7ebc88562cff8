//! Objects: the user-defined modelling units everything else points at.
//!
//! An object carries free-form scalar attributes and zero or more tables.
//! `created_date`, `modified_date` and `revision` are always server-controlled:
//! callers never supply them.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
  Error,
  id::ObjectId,
  validate::{invalid, not_blank},
};

// ─── Scalars ─────────────────────────────────────────────────────────────────

/// A JSON scalar leaf. Arrays and nested objects are not representable, so
/// they fail at deserialisation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Text(String),
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => f.write_str("null"),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Int(i) => write!(f, "{i}"),
      Self::Float(x) => write!(f, "{x}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}

impl From<&str> for Scalar {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<i64> for Scalar {
  fn from(i: i64) -> Self { Self::Int(i) }
}

/// Open key → scalar mapping used for object attributes and hierarchy
/// properties. Keys iterate in sorted order.
pub type Attributes = BTreeMap<String, Scalar>;

// ─── Kind ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
  Item,
  Document,
}

impl ObjectKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Item => "Item",
      Self::Document => "Document",
    }
  }
}

impl fmt::Display for ObjectKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ObjectKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Item" => Ok(Self::Item),
      "Document" => Ok(Self::Document),
      other => Err(Error::UnknownObjectKind(other.to_owned())),
    }
  }
}

// ─── Tables ──────────────────────────────────────────────────────────────────

fn default_column_type() -> String { "string".to_owned() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TableColumn {
  #[validate(custom(function = "not_blank"))]
  pub name:        String,
  #[serde(rename = "type", default = "default_column_type")]
  pub column_type: String,
}

impl TableColumn {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), column_type: default_column_type() }
  }
}

/// A named column group attached to an object, with optional row data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "rows_fit_columns"))]
pub struct TableData {
  #[validate(custom(function = "not_blank"))]
  pub name:    String,
  #[serde(default)]
  #[validate(nested)]
  pub columns: Vec<TableColumn>,
  #[serde(default)]
  pub data:    Vec<Vec<Scalar>>,
}

fn rows_fit_columns(table: &TableData) -> Result<(), ValidationError> {
  let width = table.columns.len();
  match table.data.iter().position(|row| row.len() > width) {
    Some(i) => Err(invalid(
      "row_too_wide",
      format!("row {i} of table {:?} has more cells than columns", table.name),
    )),
    None => Ok(()),
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
  pub id:            ObjectId,
  pub name:          String,
  pub description:   String,
  #[serde(rename = "type")]
  pub kind:          ObjectKind,
  pub attributes:    Attributes,
  pub tables:        Vec<TableData>,
  /// Set once at creation.
  pub created_date:  DateTime<Utc>,
  /// Refreshed on every update; never earlier than `created_date`.
  pub modified_date: DateTime<Utc>,
  /// Starts at 1 and increments by exactly one per update.
  pub revision:      u32,
}

impl ObjectRecord {
  /// Build a fresh record from a validated payload.
  pub fn create(input: NewObject, now: DateTime<Utc>) -> Self {
    Self {
      id:            ObjectId::generate(),
      name:          input.name,
      description:   input.description,
      kind:          input.kind,
      attributes:    input.attributes,
      tables:        input.tables,
      created_date:  now,
      modified_date: now,
      revision:      1,
    }
  }

  /// Merge `patch` onto this record and bump the server-controlled fields.
  pub fn apply(&mut self, patch: ObjectPatch, now: DateTime<Utc>) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(kind) = patch.kind {
      self.kind = kind;
    }
    if let Some(attributes) = patch.attributes {
      self.attributes = attributes;
    }
    if let Some(tables) = patch.tables {
      self.tables = tables;
    }
    self.modified_date = now.max(self.modified_date);
    self.revision += 1;
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::EntityStore::create_object`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewObject {
  #[validate(custom(function = "not_blank"))]
  pub name:        String,
  pub description: String,
  #[serde(rename = "type")]
  pub kind:        ObjectKind,
  #[serde(default)]
  pub attributes:  Attributes,
  #[serde(default)]
  #[validate(nested)]
  pub tables:      Vec<TableData>,
}

impl NewObject {
  /// Convenience constructor with empty attributes and tables.
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    kind: ObjectKind,
  ) -> Self {
    Self {
      name: name.into(),
      description: description.into(),
      kind,
      attributes: Attributes::new(),
      tables: Vec::new(),
    }
  }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ObjectPatch {
  #[validate(custom(function = "not_blank"))]
  pub name:        Option<String>,
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub kind:        Option<ObjectKind>,
  pub attributes:  Option<Attributes>,
  #[validate(nested)]
  pub tables:      Option<Vec<TableData>>,
}

#[cfg(test)]
mod tests {
  use chrono::Duration;
  use serde_json::json;

  use super::*;

  #[test]
  fn create_sets_server_fields() {
    let now = Utc::now();
    let rec = ObjectRecord::create(NewObject::new("Widget", "d", ObjectKind::Item), now);
    assert_eq!(rec.revision, 1);
    assert_eq!(rec.created_date, rec.modified_date);
    assert!(rec.attributes.is_empty());
    assert!(rec.tables.is_empty());
  }

  #[test]
  fn apply_merges_only_supplied_fields() {
    let now = Utc::now();
    let mut rec =
      ObjectRecord::create(NewObject::new("Widget", "d", ObjectKind::Item), now);
    rec.apply(
      ObjectPatch { description: Some("d2".into()), ..Default::default() },
      now + Duration::seconds(1),
    );
    assert_eq!(rec.name, "Widget");
    assert_eq!(rec.description, "d2");
    assert_eq!(rec.revision, 2);
    assert!(rec.modified_date > rec.created_date);
  }

  #[test]
  fn apply_never_moves_modified_date_backwards() {
    let now = Utc::now();
    let mut rec =
      ObjectRecord::create(NewObject::new("Widget", "d", ObjectKind::Item), now);
    rec.apply(ObjectPatch::default(), now - Duration::hours(1));
    assert_eq!(rec.modified_date, now);
    assert_eq!(rec.revision, 2);
  }

  #[test]
  fn new_object_defaults_optional_containers() {
    let input: NewObject = serde_json::from_value(json!({
      "name": "Widget", "description": "d", "type": "Item", "unknown": 1
    }))
    .unwrap();
    assert!(input.validate().is_ok());
    assert!(input.attributes.is_empty());
    assert!(input.tables.is_empty());
  }

  #[test]
  fn nested_attribute_values_are_rejected() {
    let res = serde_json::from_value::<NewObject>(json!({
      "name": "Widget", "description": "d", "type": "Item",
      "attributes": { "nested": { "a": 1 } }
    }));
    assert!(res.is_err());
  }

  #[test]
  fn unknown_kind_is_rejected() {
    let res = serde_json::from_value::<NewObject>(json!({
      "name": "Widget", "description": "d", "type": "Gadget"
    }));
    assert!(res.is_err());
    assert!("Gadget".parse::<ObjectKind>().is_err());
  }

  #[test]
  fn blank_name_fails_validation() {
    let input = NewObject::new("   ", "d", ObjectKind::Document);
    assert!(input.validate().is_err());
  }

  #[test]
  fn rows_wider_than_columns_fail_validation() {
    let mut input = NewObject::new("Widget", "d", ObjectKind::Item);
    input.tables.push(TableData {
      name:    "Users".into(),
      columns: vec![TableColumn::new("id")],
      data:    vec![vec!["u1".into(), "extra".into()]],
    });
    assert!(input.validate().is_err());

    input.tables[0].columns.push(TableColumn::new("email"));
    assert!(input.validate().is_ok());
  }

  #[test]
  fn scalars_round_trip_through_json() {
    let attrs: Attributes = serde_json::from_value(json!({
      "status": "Active", "count": 3, "ratio": 0.5, "flag": true, "none": null
    }))
    .unwrap();
    assert_eq!(attrs["status"], Scalar::Text("Active".into()));
    assert_eq!(attrs["count"], Scalar::Int(3));
    assert_eq!(attrs["ratio"], Scalar::Float(0.5));
    assert_eq!(attrs["flag"], Scalar::Bool(true));
    assert_eq!(attrs["none"], Scalar::Null);
  }
}
