//! The `EntityStore` trait.
//!
//! The trait is implemented by storage backends (`ods-store-mem`,
//! `ods-store-sqlite`). Higher layers (`ods-api`, `ods-ai`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Contract shared by every entity kind:
//!
//! - `list_*` returns records in insertion order; updates do not reorder.
//! - `get_*` and `update_*` return `Ok(None)` for an unknown id.
//! - `delete_*` returns whether a record was removed.
//! - Inputs are assumed to have passed validation already.
//!
//! Deleting an object follows the *retain* policy: relations and hierarchies
//! that reference it are left untouched, so their ids dangle. Consumers
//! resolve references through [`Dataset::object`].

use std::future::Future;

use crate::{
  chat::{ChatSessionPatch, ChatSessionRecord, NewChatSession},
  dataset::Dataset,
  hierarchy::{HierarchyPatch, HierarchyRecord, NewHierarchy},
  id::{HierarchyId, ObjectId, RelationId, SessionId},
  object::{NewObject, ObjectPatch, ObjectRecord},
  relation::{NewRelation, RelationPatch, RelationRecord},
};

/// Abstraction over an entity store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Objects ───────────────────────────────────────────────────────────

  fn list_objects(
    &self,
  ) -> impl Future<Output = Result<Vec<ObjectRecord>, Self::Error>> + Send + '_;

  fn get_object<'a>(
    &'a self,
    id: &'a ObjectId,
  ) -> impl Future<Output = Result<Option<ObjectRecord>, Self::Error>> + Send + 'a;

  /// Persist a new object with a fresh id, `revision = 1` and both dates set
  /// to now.
  fn create_object(
    &self,
    input: NewObject,
  ) -> impl Future<Output = Result<ObjectRecord, Self::Error>> + Send + '_;

  /// Merge `patch` onto the stored object. Always refreshes `modified_date`
  /// and increments `revision`, even for an empty patch.
  fn update_object<'a>(
    &'a self,
    id: &'a ObjectId,
    patch: ObjectPatch,
  ) -> impl Future<Output = Result<Option<ObjectRecord>, Self::Error>> + Send + 'a;

  /// Remove an object. Does not cascade to relations or hierarchies.
  fn delete_object<'a>(
    &'a self,
    id: &'a ObjectId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Relations ─────────────────────────────────────────────────────────

  fn list_relations(
    &self,
  ) -> impl Future<Output = Result<Vec<RelationRecord>, Self::Error>> + Send + '_;

  fn get_relation<'a>(
    &'a self,
    id: &'a RelationId,
  ) -> impl Future<Output = Result<Option<RelationRecord>, Self::Error>> + Send + 'a;

  /// Every relation where `object_id` is the primary object or one of the
  /// secondary objects.
  fn object_relations<'a>(
    &'a self,
    object_id: &'a ObjectId,
  ) -> impl Future<Output = Result<Vec<RelationRecord>, Self::Error>> + Send + 'a;

  fn create_relation(
    &self,
    input: NewRelation,
  ) -> impl Future<Output = Result<RelationRecord, Self::Error>> + Send + '_;

  fn update_relation<'a>(
    &'a self,
    id: &'a RelationId,
    patch: RelationPatch,
  ) -> impl Future<Output = Result<Option<RelationRecord>, Self::Error>> + Send + 'a;

  fn delete_relation<'a>(
    &'a self,
    id: &'a RelationId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Hierarchies ───────────────────────────────────────────────────────

  fn list_hierarchies(
    &self,
  ) -> impl Future<Output = Result<Vec<HierarchyRecord>, Self::Error>> + Send + '_;

  fn get_hierarchy<'a>(
    &'a self,
    id: &'a HierarchyId,
  ) -> impl Future<Output = Result<Option<HierarchyRecord>, Self::Error>> + Send + 'a;

  /// Every hierarchy where `object_id` is the parent or one of the children.
  fn object_hierarchies<'a>(
    &'a self,
    object_id: &'a ObjectId,
  ) -> impl Future<Output = Result<Vec<HierarchyRecord>, Self::Error>> + Send + 'a;

  fn create_hierarchy(
    &self,
    input: NewHierarchy,
  ) -> impl Future<Output = Result<HierarchyRecord, Self::Error>> + Send + '_;

  fn update_hierarchy<'a>(
    &'a self,
    id: &'a HierarchyId,
    patch: HierarchyPatch,
  ) -> impl Future<Output = Result<Option<HierarchyRecord>, Self::Error>> + Send + 'a;

  fn delete_hierarchy<'a>(
    &'a self,
    id: &'a HierarchyId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Chat sessions ─────────────────────────────────────────────────────

  fn list_chat_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<ChatSessionRecord>, Self::Error>> + Send + '_;

  fn get_chat_session<'a>(
    &'a self,
    id: &'a SessionId,
  ) -> impl Future<Output = Result<Option<ChatSessionRecord>, Self::Error>> + Send + 'a;

  fn create_chat_session(
    &self,
    input: NewChatSession,
  ) -> impl Future<Output = Result<ChatSessionRecord, Self::Error>> + Send + '_;

  fn update_chat_session<'a>(
    &'a self,
    id: &'a SessionId,
    patch: ChatSessionPatch,
  ) -> impl Future<Output = Result<Option<ChatSessionRecord>, Self::Error>> + Send + 'a;

  fn delete_chat_session<'a>(
    &'a self,
    id: &'a SessionId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Provided ──────────────────────────────────────────────────────────

  /// Read objects, relations and hierarchies into one [`Dataset`].
  ///
  /// The three reads are independent; a concurrent write may land between
  /// them.
  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Dataset, Self::Error>> + Send + '_ {
    async move {
      Ok(Dataset {
        objects:     self.list_objects().await?,
        relations:   self.list_relations().await?,
        hierarchies: self.list_hierarchies().await?,
      })
    }
  }
}
