//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Attribute maps, tables, id
//! lists and chat messages are stored as compact JSON. Ids are stored as the
//! bare strings they wrap.

use chrono::{DateTime, Utc};
use ods_core::{
  chat::ChatSessionRecord,
  hierarchy::HierarchyRecord,
  object::{ObjectKind, ObjectRecord},
  relation::RelationRecord,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Call errors ─────────────────────────────────────────────────────────────

/// Wrap a decode failure so it can be returned from inside a
/// [`tokio_rusqlite::Connection::call`] closure.
pub fn call_error(e: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Objects ─────────────────────────────────────────────────────────────────

pub const OBJECT_COLUMNS: &str = "id, name, description, kind, attributes, \
                                  tables_json, created_date, modified_date, \
                                  revision";

/// Raw column values of an `objects` row.
pub struct RawObject {
  pub id:            String,
  pub name:          String,
  pub description:   String,
  pub kind:          String,
  pub attributes:    String,
  pub tables_json:   String,
  pub created_date:  String,
  pub modified_date: String,
  pub revision:      i64,
}

impl RawObject {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      description:   row.get(2)?,
      kind:          row.get(3)?,
      attributes:    row.get(4)?,
      tables_json:   row.get(5)?,
      created_date:  row.get(6)?,
      modified_date: row.get(7)?,
      revision:      row.get(8)?,
    })
  }

  pub fn from_record(r: &ObjectRecord) -> Result<Self> {
    Ok(Self {
      id:            r.id.to_string(),
      name:          r.name.clone(),
      description:   r.description.clone(),
      kind:          r.kind.as_str().to_owned(),
      attributes:    serde_json::to_string(&r.attributes)?,
      tables_json:   serde_json::to_string(&r.tables)?,
      created_date:  encode_dt(r.created_date),
      modified_date: encode_dt(r.modified_date),
      revision:      i64::from(r.revision),
    })
  }

  pub fn into_record(self) -> Result<ObjectRecord> {
    Ok(ObjectRecord {
      id:            self.id.into(),
      name:          self.name,
      description:   self.description,
      kind:          self.kind.parse::<ObjectKind>()?,
      attributes:    serde_json::from_str(&self.attributes)?,
      tables:        serde_json::from_str(&self.tables_json)?,
      created_date:  decode_dt(&self.created_date)?,
      modified_date: decode_dt(&self.modified_date)?,
      revision:      u32::try_from(self.revision).map_err(|_| Error::OutOfRange {
        column: "revision",
        value:  self.revision,
      })?,
    })
  }
}

// ─── Relations ───────────────────────────────────────────────────────────────

pub const RELATION_COLUMNS: &str =
  "id, primary_object_id, secondary_object_ids, relation_type, description";

/// Raw column values of a `relations` row.
pub struct RawRelation {
  pub id:                   String,
  pub primary_object_id:    String,
  pub secondary_object_ids: String,
  pub relation_type:        String,
  pub description:          Option<String>,
}

impl RawRelation {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      primary_object_id:    row.get(1)?,
      secondary_object_ids: row.get(2)?,
      relation_type:        row.get(3)?,
      description:          row.get(4)?,
    })
  }

  pub fn from_record(r: &RelationRecord) -> Result<Self> {
    Ok(Self {
      id:                   r.id.to_string(),
      primary_object_id:    r.primary_object_id.to_string(),
      secondary_object_ids: serde_json::to_string(&r.secondary_object_ids)?,
      relation_type:        r.relation_type.clone(),
      description:          r.description.clone(),
    })
  }

  pub fn into_record(self) -> Result<RelationRecord> {
    Ok(RelationRecord {
      id:                   self.id.into(),
      primary_object_id:    self.primary_object_id.into(),
      secondary_object_ids: serde_json::from_str(&self.secondary_object_ids)?,
      relation_type:        self.relation_type,
      description:          self.description,
    })
  }
}

// ─── Hierarchies ─────────────────────────────────────────────────────────────

pub const HIERARCHY_COLUMNS: &str =
  "id, parent_object_id, child_object_ids, level, properties";

/// Raw column values of a `hierarchies` row.
pub struct RawHierarchy {
  pub id:               String,
  pub parent_object_id: Option<String>,
  pub child_object_ids: String,
  pub level:            i64,
  pub properties:       String,
}

impl RawHierarchy {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      parent_object_id: row.get(1)?,
      child_object_ids: row.get(2)?,
      level:            row.get(3)?,
      properties:       row.get(4)?,
    })
  }

  pub fn from_record(r: &HierarchyRecord) -> Result<Self> {
    Ok(Self {
      id:               r.id.to_string(),
      parent_object_id: r.parent_object_id.as_ref().map(ToString::to_string),
      child_object_ids: serde_json::to_string(&r.child_object_ids)?,
      level:            i64::from(r.level),
      properties:       serde_json::to_string(&r.properties)?,
    })
  }

  pub fn into_record(self) -> Result<HierarchyRecord> {
    Ok(HierarchyRecord {
      id:               self.id.into(),
      parent_object_id: self.parent_object_id.map(Into::into),
      child_object_ids: serde_json::from_str(&self.child_object_ids)?,
      level:            i32::try_from(self.level).map_err(|_| Error::OutOfRange {
        column: "level",
        value:  self.level,
      })?,
      properties:       serde_json::from_str(&self.properties)?,
    })
  }
}

// ─── Chat sessions ───────────────────────────────────────────────────────────

pub const SESSION_COLUMNS: &str = "id, messages, created_date";

/// Raw column values of a `chat_sessions` row.
pub struct RawSession {
  pub id:           String,
  pub messages:     String,
  pub created_date: String,
}

impl RawSession {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      messages:     row.get(1)?,
      created_date: row.get(2)?,
    })
  }

  pub fn from_record(r: &ChatSessionRecord) -> Result<Self> {
    Ok(Self {
      id:           r.id.to_string(),
      messages:     serde_json::to_string(&r.messages)?,
      created_date: encode_dt(r.created_date),
    })
  }

  pub fn into_record(self) -> Result<ChatSessionRecord> {
    Ok(ChatSessionRecord {
      id:           self.id.into(),
      messages:     serde_json::from_str(&self.messages)?,
      created_date: decode_dt(&self.created_date)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use ods_core::dataset::Dataset;

  use super::*;

  #[test]
  fn sample_records_survive_encoding() {
    let ds = Dataset::sample();
    for o in &ds.objects {
      let back = RawObject::from_record(o).unwrap().into_record().unwrap();
      assert_eq!(&back, o);
    }
    for h in &ds.hierarchies {
      let back = RawHierarchy::from_record(h).unwrap().into_record().unwrap();
      assert_eq!(&back, h);
    }
  }

  #[test]
  fn negative_revision_is_rejected() {
    let mut raw = RawObject::from_record(&Dataset::sample().objects[0]).unwrap();
    raw.revision = -1;
    assert!(matches!(
      raw.into_record(),
      Err(Error::OutOfRange { column: "revision", .. })
    ));
  }
}
