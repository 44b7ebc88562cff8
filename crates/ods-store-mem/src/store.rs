//! [`MemStore`]: the in-memory implementation of [`EntityStore`].

use std::{convert::Infallible, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;

use ods_core::{
  chat::{ChatSessionPatch, ChatSessionRecord, NewChatSession},
  dataset::Dataset,
  hierarchy::{HierarchyPatch, HierarchyRecord, NewHierarchy},
  id::{HierarchyId, ObjectId, RelationId, SessionId},
  object::{NewObject, ObjectPatch, ObjectRecord},
  relation::{NewRelation, RelationPatch, RelationRecord},
  store::EntityStore,
};

use crate::collection::Collection;

type Result<T> = std::result::Result<T, Infallible>;

#[derive(Debug, Default)]
struct Collections {
  objects:       Collection<ObjectId, ObjectRecord>,
  relations:     Collection<RelationId, RelationRecord>,
  hierarchies:   Collection<HierarchyId, HierarchyRecord>,
  chat_sessions: Collection<SessionId, ChatSessionRecord>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A process-local entity store.
///
/// Cloning is cheap and every clone shares the same collections. Each
/// operation holds the lock for its whole read-modify-write, so concurrent
/// updates to one record serialise; the last one wins.
#[derive(Clone, Debug, Default)]
pub struct MemStore {
  inner: Arc<RwLock<Collections>>,
}

impl MemStore {
  /// An empty store.
  pub fn new() -> Self { Self::default() }

  /// A store pre-populated with `dataset`, records kept verbatim (ids, dates
  /// and revisions included).
  pub fn with_dataset(dataset: Dataset) -> Self {
    let mut cols = Collections::default();
    for o in dataset.objects {
      cols.objects.insert(o.id.clone(), o);
    }
    for r in dataset.relations {
      cols.relations.insert(r.id.clone(), r);
    }
    for h in dataset.hierarchies {
      cols.hierarchies.insert(h.id.clone(), h);
    }
    tracing::debug!(
      objects = cols.objects.len(),
      relations = cols.relations.len(),
      hierarchies = cols.hierarchies.len(),
      "seeded in-memory store"
    );
    Self { inner: Arc::new(RwLock::new(cols)) }
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for MemStore {
  type Error = Infallible;

  // ── Objects ───────────────────────────────────────────────────────────────

  async fn list_objects(&self) -> Result<Vec<ObjectRecord>> {
    Ok(self.inner.read().await.objects.values().cloned().collect())
  }

  async fn get_object(&self, id: &ObjectId) -> Result<Option<ObjectRecord>> {
    Ok(self.inner.read().await.objects.get(id).cloned())
  }

  async fn create_object(&self, input: NewObject) -> Result<ObjectRecord> {
    let record = ObjectRecord::create(input, Utc::now());
    self
      .inner
      .write()
      .await
      .objects
      .insert(record.id.clone(), record.clone());
    Ok(record)
  }

  async fn update_object(
    &self,
    id: &ObjectId,
    patch: ObjectPatch,
  ) -> Result<Option<ObjectRecord>> {
    let mut cols = self.inner.write().await;
    Ok(cols.objects.get_mut(id).map(|record| {
      record.apply(patch, Utc::now());
      record.clone()
    }))
  }

  async fn delete_object(&self, id: &ObjectId) -> Result<bool> {
    Ok(self.inner.write().await.objects.remove(id).is_some())
  }

  // ── Relations ─────────────────────────────────────────────────────────────

  async fn list_relations(&self) -> Result<Vec<RelationRecord>> {
    Ok(self.inner.read().await.relations.values().cloned().collect())
  }

  async fn get_relation(&self, id: &RelationId) -> Result<Option<RelationRecord>> {
    Ok(self.inner.read().await.relations.get(id).cloned())
  }

  async fn object_relations(&self, object_id: &ObjectId) -> Result<Vec<RelationRecord>> {
    Ok(
      self
        .inner
        .read()
        .await
        .relations
        .values()
        .filter(|r| r.involves(object_id))
        .cloned()
        .collect(),
    )
  }

  async fn create_relation(&self, input: NewRelation) -> Result<RelationRecord> {
    let record = RelationRecord::create(input);
    self
      .inner
      .write()
      .await
      .relations
      .insert(record.id.clone(), record.clone());
    Ok(record)
  }

  async fn update_relation(
    &self,
    id: &RelationId,
    patch: RelationPatch,
  ) -> Result<Option<RelationRecord>> {
    let mut cols = self.inner.write().await;
    Ok(cols.relations.get_mut(id).map(|record| {
      record.apply(patch);
      record.clone()
    }))
  }

  async fn delete_relation(&self, id: &RelationId) -> Result<bool> {
    Ok(self.inner.write().await.relations.remove(id).is_some())
  }

  // ── Hierarchies ───────────────────────────────────────────────────────────

  async fn list_hierarchies(&self) -> Result<Vec<HierarchyRecord>> {
    Ok(self.inner.read().await.hierarchies.values().cloned().collect())
  }

  async fn get_hierarchy(&self, id: &HierarchyId) -> Result<Option<HierarchyRecord>> {
    Ok(self.inner.read().await.hierarchies.get(id).cloned())
  }

  async fn object_hierarchies(
    &self,
    object_id: &ObjectId,
  ) -> Result<Vec<HierarchyRecord>> {
    Ok(
      self
        .inner
        .read()
        .await
        .hierarchies
        .values()
        .filter(|h| h.involves(object_id))
        .cloned()
        .collect(),
    )
  }

  async fn create_hierarchy(&self, input: NewHierarchy) -> Result<HierarchyRecord> {
    let record = HierarchyRecord::create(input);
    self
      .inner
      .write()
      .await
      .hierarchies
      .insert(record.id.clone(), record.clone());
    Ok(record)
  }

  async fn update_hierarchy(
    &self,
    id: &HierarchyId,
    patch: HierarchyPatch,
  ) -> Result<Option<HierarchyRecord>> {
    let mut cols = self.inner.write().await;
    Ok(cols.hierarchies.get_mut(id).map(|record| {
      record.apply(patch);
      record.clone()
    }))
  }

  async fn delete_hierarchy(&self, id: &HierarchyId) -> Result<bool> {
    Ok(self.inner.write().await.hierarchies.remove(id).is_some())
  }

  // ── Chat sessions ─────────────────────────────────────────────────────────

  async fn list_chat_sessions(&self) -> Result<Vec<ChatSessionRecord>> {
    Ok(self.inner.read().await.chat_sessions.values().cloned().collect())
  }

  async fn get_chat_session(&self, id: &SessionId) -> Result<Option<ChatSessionRecord>> {
    Ok(self.inner.read().await.chat_sessions.get(id).cloned())
  }

  async fn create_chat_session(
    &self,
    input: NewChatSession,
  ) -> Result<ChatSessionRecord> {
    let record = ChatSessionRecord::create(input, Utc::now());
    self
      .inner
      .write()
      .await
      .chat_sessions
      .insert(record.id.clone(), record.clone());
    Ok(record)
  }

  async fn update_chat_session(
    &self,
    id: &SessionId,
    patch: ChatSessionPatch,
  ) -> Result<Option<ChatSessionRecord>> {
    let mut cols = self.inner.write().await;
    Ok(cols.chat_sessions.get_mut(id).map(|record| {
      record.apply(patch);
      record.clone()
    }))
  }

  async fn delete_chat_session(&self, id: &SessionId) -> Result<bool> {
    Ok(self.inner.write().await.chat_sessions.remove(id).is_some())
  }
}
