//! [`SqliteStore`]: the SQLite implementation of [`EntityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row};

use ods_core::{
  chat::{ChatSessionPatch, ChatSessionRecord, NewChatSession},
  dataset::Dataset,
  hierarchy::{HierarchyPatch, HierarchyRecord, NewHierarchy},
  id::{HierarchyId, ObjectId, RelationId, SessionId},
  object::{NewObject, ObjectPatch, ObjectRecord},
  relation::{NewRelation, RelationPatch, RelationRecord},
  store::EntityStore,
};

use crate::{
  Result,
  encode::{
    HIERARCHY_COLUMNS, OBJECT_COLUMNS, RELATION_COLUMNS, RawHierarchy, RawObject,
    RawRelation, RawSession, SESSION_COLUMNS, call_error,
  },
  schema::SCHEMA,
};

// ─── Insert statements ───────────────────────────────────────────────────────

fn insert_object(conn: &rusqlite::Connection, raw: &RawObject) -> rusqlite::Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO objects ({OBJECT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
    ),
    rusqlite::params![
      raw.id,
      raw.name,
      raw.description,
      raw.kind,
      raw.attributes,
      raw.tables_json,
      raw.created_date,
      raw.modified_date,
      raw.revision,
    ],
  )?;
  Ok(())
}

fn insert_relation(
  conn: &rusqlite::Connection,
  raw: &RawRelation,
) -> rusqlite::Result<()> {
  conn.execute(
    &format!("INSERT INTO relations ({RELATION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
    rusqlite::params![
      raw.id,
      raw.primary_object_id,
      raw.secondary_object_ids,
      raw.relation_type,
      raw.description,
    ],
  )?;
  Ok(())
}

fn insert_hierarchy(
  conn: &rusqlite::Connection,
  raw: &RawHierarchy,
) -> rusqlite::Result<()> {
  conn.execute(
    &format!("INSERT INTO hierarchies ({HIERARCHY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
    rusqlite::params![
      raw.id,
      raw.parent_object_id,
      raw.child_object_ids,
      raw.level,
      raw.properties,
    ],
  )?;
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An entity store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load `dataset` verbatim if the objects, relations and hierarchies tables
  /// are all empty. Returns whether anything was written.
  pub async fn seed_if_empty(&self, dataset: Dataset) -> Result<bool> {
    let objects = dataset
      .objects
      .iter()
      .map(RawObject::from_record)
      .collect::<Result<Vec<_>>>()?;
    let relations = dataset
      .relations
      .iter()
      .map(RawRelation::from_record)
      .collect::<Result<Vec<_>>>()?;
    let hierarchies = dataset
      .hierarchies
      .iter()
      .map(RawHierarchy::from_record)
      .collect::<Result<Vec<_>>>()?;

    let seeded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: i64 = tx.query_row(
          "SELECT (SELECT COUNT(*) FROM objects)
                + (SELECT COUNT(*) FROM relations)
                + (SELECT COUNT(*) FROM hierarchies)",
          [],
          |r| r.get(0),
        )?;
        if existing > 0 {
          return Ok(false);
        }
        for raw in &objects {
          insert_object(&tx, raw)?;
        }
        for raw in &relations {
          insert_relation(&tx, raw)?;
        }
        for raw in &hierarchies {
          insert_hierarchy(&tx, raw)?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if seeded {
      tracing::info!(
        objects = dataset.objects.len(),
        relations = dataset.relations.len(),
        hierarchies = dataset.hierarchies.len(),
        "seeded sqlite store"
      );
    }
    Ok(seeded)
  }

  /// Run a query whose rows map through `from_row`.
  async fn select_many<T, F>(
    &self,
    sql: String,
    args: Vec<String>,
    from_row: F,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args.iter()), &from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Fetch at most one row by primary key.
  async fn select_by_id<T, F>(
    &self,
    table: &'static str,
    columns: &'static str,
    id: String,
    from_row: F,
  ) -> Result<Option<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {columns} FROM {table} WHERE id = ?1"),
              rusqlite::params![id],
              |r| from_row(r),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn delete_by_id(&self, table: &'static str, id: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1"),
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = crate::Error;

  // ── Objects ───────────────────────────────────────────────────────────────

  async fn list_objects(&self) -> Result<Vec<ObjectRecord>> {
    let raws = self
      .select_many(
        format!("SELECT {OBJECT_COLUMNS} FROM objects ORDER BY rowid"),
        vec![],
        RawObject::from_row,
      )
      .await?;
    raws.into_iter().map(RawObject::into_record).collect()
  }

  async fn get_object(&self, id: &ObjectId) -> Result<Option<ObjectRecord>> {
    self
      .select_by_id("objects", OBJECT_COLUMNS, id.to_string(), RawObject::from_row)
      .await?
      .map(RawObject::into_record)
      .transpose()
  }

  async fn create_object(&self, input: NewObject) -> Result<ObjectRecord> {
    let record = ObjectRecord::create(input, Utc::now());
    let raw = RawObject::from_record(&record)?;
    self
      .conn
      .call(move |conn| Ok(insert_object(conn, &raw)?))
      .await?;
    Ok(record)
  }

  async fn update_object(
    &self,
    id: &ObjectId,
    patch: ObjectPatch,
  ) -> Result<Option<ObjectRecord>> {
    let id_str = id.to_string();
    let now = Utc::now();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {OBJECT_COLUMNS} FROM objects WHERE id = ?1"),
            rusqlite::params![id_str],
            RawObject::from_row,
          )
          .optional()?;
        let Some(raw) = raw else { return Ok(None) };

        let mut record = raw.into_record().map_err(call_error)?;
        record.apply(patch, now);
        let raw = RawObject::from_record(&record).map_err(call_error)?;

        tx.execute(
          "UPDATE objects
              SET name = ?2, description = ?3, kind = ?4, attributes = ?5,
                  tables_json = ?6, modified_date = ?7, revision = ?8
            WHERE id = ?1",
          rusqlite::params![
            raw.id,
            raw.name,
            raw.description,
            raw.kind,
            raw.attributes,
            raw.tables_json,
            raw.modified_date,
            raw.revision,
          ],
        )?;
        tx.commit()?;
        Ok(Some(record))
      })
      .await?;
    Ok(updated)
  }

  async fn delete_object(&self, id: &ObjectId) -> Result<bool> {
    self.delete_by_id("objects", id.to_string()).await
  }

  // ── Relations ─────────────────────────────────────────────────────────────

  async fn list_relations(&self) -> Result<Vec<RelationRecord>> {
    let raws = self
      .select_many(
        format!("SELECT {RELATION_COLUMNS} FROM relations ORDER BY rowid"),
        vec![],
        RawRelation::from_row,
      )
      .await?;
    raws.into_iter().map(RawRelation::into_record).collect()
  }

  async fn get_relation(&self, id: &RelationId) -> Result<Option<RelationRecord>> {
    self
      .select_by_id("relations", RELATION_COLUMNS, id.to_string(), RawRelation::from_row)
      .await?
      .map(RawRelation::into_record)
      .transpose()
  }

  async fn object_relations(&self, object_id: &ObjectId) -> Result<Vec<RelationRecord>> {
    let raws = self
      .select_many(
        format!(
          "SELECT {RELATION_COLUMNS} FROM relations
            WHERE primary_object_id = ?1
               OR EXISTS (SELECT 1 FROM json_each(relations.secondary_object_ids)
                           WHERE json_each.value = ?1)
            ORDER BY relations.rowid"
        ),
        vec![object_id.to_string()],
        RawRelation::from_row,
      )
      .await?;
    raws.into_iter().map(RawRelation::into_record).collect()
  }

  async fn create_relation(&self, input: NewRelation) -> Result<RelationRecord> {
    let record = RelationRecord::create(input);
    let raw = RawRelation::from_record(&record)?;
    self
      .conn
      .call(move |conn| Ok(insert_relation(conn, &raw)?))
      .await?;
    Ok(record)
  }

  async fn update_relation(
    &self,
    id: &RelationId,
    patch: RelationPatch,
  ) -> Result<Option<RelationRecord>> {
    let id_str = id.to_string();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {RELATION_COLUMNS} FROM relations WHERE id = ?1"),
            rusqlite::params![id_str],
            RawRelation::from_row,
          )
          .optional()?;
        let Some(raw) = raw else { return Ok(None) };

        let mut record = raw.into_record().map_err(call_error)?;
        record.apply(patch);
        let raw = RawRelation::from_record(&record).map_err(call_error)?;

        tx.execute(
          "UPDATE relations
              SET primary_object_id = ?2, secondary_object_ids = ?3,
                  relation_type = ?4, description = ?5
            WHERE id = ?1",
          rusqlite::params![
            raw.id,
            raw.primary_object_id,
            raw.secondary_object_ids,
            raw.relation_type,
            raw.description,
          ],
        )?;
        tx.commit()?;
        Ok(Some(record))
      })
      .await?;
    Ok(updated)
  }

  async fn delete_relation(&self, id: &RelationId) -> Result<bool> {
    self.delete_by_id("relations", id.to_string()).await
  }

  // ── Hierarchies ───────────────────────────────────────────────────────────

  async fn list_hierarchies(&self) -> Result<Vec<HierarchyRecord>> {
    let raws = self
      .select_many(
        format!("SELECT {HIERARCHY_COLUMNS} FROM hierarchies ORDER BY rowid"),
        vec![],
        RawHierarchy::from_row,
      )
      .await?;
    raws.into_iter().map(RawHierarchy::into_record).collect()
  }

  async fn get_hierarchy(&self, id: &HierarchyId) -> Result<Option<HierarchyRecord>> {
    self
      .select_by_id(
        "hierarchies",
        HIERARCHY_COLUMNS,
        id.to_string(),
        RawHierarchy::from_row,
      )
      .await?
      .map(RawHierarchy::into_record)
      .transpose()
  }

  async fn object_hierarchies(
    &self,
    object_id: &ObjectId,
  ) -> Result<Vec<HierarchyRecord>> {
    let raws = self
      .select_many(
        format!(
          "SELECT {HIERARCHY_COLUMNS} FROM hierarchies
            WHERE parent_object_id = ?1
               OR EXISTS (SELECT 1 FROM json_each(hierarchies.child_object_ids)
                           WHERE json_each.value = ?1)
            ORDER BY hierarchies.rowid"
        ),
        vec![object_id.to_string()],
        RawHierarchy::from_row,
      )
      .await?;
    raws.into_iter().map(RawHierarchy::into_record).collect()
  }

  async fn create_hierarchy(&self, input: NewHierarchy) -> Result<HierarchyRecord> {
    let record = HierarchyRecord::create(input);
    let raw = RawHierarchy::from_record(&record)?;
    self
      .conn
      .call(move |conn| Ok(insert_hierarchy(conn, &raw)?))
      .await?;
    Ok(record)
  }

  async fn update_hierarchy(
    &self,
    id: &HierarchyId,
    patch: HierarchyPatch,
  ) -> Result<Option<HierarchyRecord>> {
    let id_str = id.to_string();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {HIERARCHY_COLUMNS} FROM hierarchies WHERE id = ?1"),
            rusqlite::params![id_str],
            RawHierarchy::from_row,
          )
          .optional()?;
        let Some(raw) = raw else { return Ok(None) };

        let mut record = raw.into_record().map_err(call_error)?;
        record.apply(patch);
        let raw = RawHierarchy::from_record(&record).map_err(call_error)?;

        tx.execute(
          "UPDATE hierarchies
              SET parent_object_id = ?2, child_object_ids = ?3, level = ?4,
                  properties = ?5
            WHERE id = ?1",
          rusqlite::params![
            raw.id,
            raw.parent_object_id,
            raw.child_object_ids,
            raw.level,
            raw.properties,
          ],
        )?;
        tx.commit()?;
        Ok(Some(record))
      })
      .await?;
    Ok(updated)
  }

  async fn delete_hierarchy(&self, id: &HierarchyId) -> Result<bool> {
    self.delete_by_id("hierarchies", id.to_string()).await
  }

  // ── Chat sessions ─────────────────────────────────────────────────────────

  async fn list_chat_sessions(&self) -> Result<Vec<ChatSessionRecord>> {
    let raws = self
      .select_many(
        format!("SELECT {SESSION_COLUMNS} FROM chat_sessions ORDER BY rowid"),
        vec![],
        RawSession::from_row,
      )
      .await?;
    raws.into_iter().map(RawSession::into_record).collect()
  }

  async fn get_chat_session(&self, id: &SessionId) -> Result<Option<ChatSessionRecord>> {
    self
      .select_by_id("chat_sessions", SESSION_COLUMNS, id.to_string(), RawSession::from_row)
      .await?
      .map(RawSession::into_record)
      .transpose()
  }

  async fn create_chat_session(
    &self,
    input: NewChatSession,
  ) -> Result<ChatSessionRecord> {
    let record = ChatSessionRecord::create(input, Utc::now());
    let raw = RawSession::from_record(&record)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO chat_sessions ({SESSION_COLUMNS}) VALUES (?1, ?2, ?3)"),
          rusqlite::params![raw.id, raw.messages, raw.created_date],
        )?;
        Ok(())
      })
      .await?;
    Ok(record)
  }

  async fn update_chat_session(
    &self,
    id: &SessionId,
    patch: ChatSessionPatch,
  ) -> Result<Option<ChatSessionRecord>> {
    let id_str = id.to_string();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM chat_sessions WHERE id = ?1"),
            rusqlite::params![id_str],
            RawSession::from_row,
          )
          .optional()?;
        let Some(raw) = raw else { return Ok(None) };

        let mut record = raw.into_record().map_err(call_error)?;
        record.apply(patch);
        let raw = RawSession::from_record(&record).map_err(call_error)?;

        tx.execute(
          "UPDATE chat_sessions SET messages = ?2 WHERE id = ?1",
          rusqlite::params![raw.id, raw.messages],
        )?;
        tx.commit()?;
        Ok(Some(record))
      })
      .await?;
    Ok(updated)
  }

  async fn delete_chat_session(&self, id: &SessionId) -> Result<bool> {
    self.delete_by_id("chat_sessions", id.to_string()).await
  }
}
