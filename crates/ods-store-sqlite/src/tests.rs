//! Integration tests for `SqliteStore` against an in-memory database.

use ods_core::{
  chat::{ChatMessage, ChatRole, ChatSessionPatch, NewChatSession},
  dataset::Dataset,
  hierarchy::{HierarchyPatch, NewHierarchy},
  id::{HierarchyId, ObjectId},
  object::{NewObject, ObjectKind, ObjectPatch, Scalar, TableColumn, TableData},
  relation::{NewRelation, RelationPatch},
  store::EntityStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn named(name: &str) -> NewObject { NewObject::new(name, "", ObjectKind::Item) }

// ─── Objects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_object_with_tables() {
  let s = store().await;

  let mut input = NewObject::new("Pump", "Feed pump", ObjectKind::Document);
  input.attributes.insert("flow".into(), Scalar::Float(12.5));
  input.attributes.insert("rated".into(), Scalar::Bool(true));
  input.tables.push(TableData {
    name:    "Specs".into(),
    columns: vec![TableColumn::new("key"), TableColumn::new("value")],
    data:    vec![vec!["rpm".into(), Scalar::Int(1450)]],
  });

  let obj = s.create_object(input).await.unwrap();
  assert_eq!(obj.revision, 1);

  let fetched = s.get_object(&obj.id).await.unwrap().unwrap();
  assert_eq!(fetched, obj);
}

#[tokio::test]
async fn get_missing_object_returns_none() {
  let s = store().await;
  assert!(s.get_object(&"nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_object_is_partial_and_bumps_revision() {
  let s = store().await;
  let obj = s
    .create_object(NewObject::new("Widget", "d", ObjectKind::Item))
    .await
    .unwrap();

  let updated = s
    .update_object(
      &obj.id,
      ObjectPatch { name: Some("Widget v2".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.name, "Widget v2");
  assert_eq!(updated.description, "d");
  assert_eq!(updated.revision, 2);
  assert_eq!(updated.created_date, obj.created_date);
  assert!(updated.modified_date >= obj.modified_date);

  let again = s
    .update_object(&obj.id, ObjectPatch::default())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(again.revision, 3);
  assert_eq!(s.get_object(&obj.id).await.unwrap(), Some(again));
}

#[tokio::test]
async fn update_missing_object_returns_none() {
  let s = store().await;
  let res = s
    .update_object(&ObjectId::from("ghost"), ObjectPatch::default())
    .await
    .unwrap();
  assert!(res.is_none());
}

#[tokio::test]
async fn delete_object_reports_whether_removed() {
  let s = store().await;
  let obj = s.create_object(named("A")).await.unwrap();

  assert!(s.delete_object(&obj.id).await.unwrap());
  assert!(!s.delete_object(&obj.id).await.unwrap());
  assert!(s.get_object(&obj.id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_objects_in_insertion_order() {
  let s = store().await;
  let a = s.create_object(named("A")).await.unwrap();
  s.create_object(named("B")).await.unwrap();
  s.create_object(named("C")).await.unwrap();

  s.update_object(&a.id, ObjectPatch { name: Some("A2".into()), ..Default::default() })
    .await
    .unwrap();

  let names: Vec<_> = s
    .list_objects()
    .await
    .unwrap()
    .into_iter()
    .map(|o| o.name)
    .collect();
  assert_eq!(names, vec!["A2", "B", "C"]);
}

// ─── Relations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn object_relations_matches_primary_and_secondary() {
  let s = store().await;
  let a = s.create_object(named("A")).await.unwrap();
  let b = s.create_object(named("B")).await.unwrap();
  let c = s.create_object(named("C")).await.unwrap();

  let r1 = s
    .create_relation(NewRelation::new(a.id.clone(), vec![b.id.clone()], "depends_on"))
    .await
    .unwrap();
  let r2 = s
    .create_relation(NewRelation::new(c.id.clone(), vec![a.id.clone()], "uses"))
    .await
    .unwrap();

  assert_eq!(s.object_relations(&a.id).await.unwrap(), vec![r1.clone(), r2.clone()]);
  assert_eq!(s.object_relations(&b.id).await.unwrap(), vec![r1]);
  assert_eq!(s.object_relations(&c.id).await.unwrap(), vec![r2]);
}

#[tokio::test]
async fn relation_partial_update_keeps_description() {
  let s = store().await;
  let mut input = NewRelation::new("a".into(), vec!["b".into()], "uses");
  input.description = Some("why".into());
  let rel = s.create_relation(input).await.unwrap();

  let updated = s
    .update_relation(
      &rel.id,
      RelationPatch { relation_type: Some("owns".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.relation_type, "owns");
  assert_eq!(updated.description.as_deref(), Some("why"));
  assert_eq!(s.get_relation(&rel.id).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn deleting_object_retains_relations() {
  let s = store().await;
  let a = s.create_object(named("A")).await.unwrap();
  let b = s.create_object(named("B")).await.unwrap();
  let rel = s
    .create_relation(NewRelation::new(a.id.clone(), vec![b.id.clone()], "uses"))
    .await
    .unwrap();

  s.delete_object(&a.id).await.unwrap();

  assert_eq!(s.list_relations().await.unwrap(), vec![rel.clone()]);
  assert_eq!(s.object_relations(&a.id).await.unwrap(), vec![rel.clone()]);

  assert!(s.delete_relation(&rel.id).await.unwrap());
  assert!(s.list_relations().await.unwrap().is_empty());
}

// ─── Hierarchies ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn hierarchy_round_trip_and_membership() {
  let s = store().await;
  let mut input = NewHierarchy {
    parent_object_id: None,
    child_object_ids: vec!["x".into(), "y".into()],
    level: 1,
    ..Default::default()
  };
  input.properties.insert("type".into(), Scalar::from("Root"));
  let h = s.create_hierarchy(input).await.unwrap();

  assert_eq!(s.get_hierarchy(&h.id).await.unwrap(), Some(h.clone()));
  assert_eq!(s.object_hierarchies(&"y".into()).await.unwrap(), vec![h.clone()]);
  assert!(s.object_hierarchies(&"z".into()).await.unwrap().is_empty());

  let moved = s
    .update_hierarchy(
      &h.id,
      HierarchyPatch { parent_object_id: Some("z".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(moved.level, 1);
  assert_eq!(moved.child_object_ids.len(), 2);
  assert_eq!(s.object_hierarchies(&"z".into()).await.unwrap(), vec![moved]);
}

#[tokio::test]
async fn update_and_delete_missing_hierarchy() {
  let s = store().await;
  let id = HierarchyId::from("none");
  assert!(
    s.update_hierarchy(&id, HierarchyPatch::default())
      .await
      .unwrap()
      .is_none()
  );
  assert!(!s.delete_hierarchy(&id).await.unwrap());
}

// ─── Chat sessions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_session_messages_are_replaced_on_update() {
  let s = store().await;
  let session = s.create_chat_session(NewChatSession::default()).await.unwrap();

  let now = chrono::Utc::now();
  let messages = vec![
    ChatMessage::new(ChatRole::User, "What is obj1?", now),
    ChatMessage::new(ChatRole::Assistant, "A system component.", now),
  ];
  let updated = s
    .update_chat_session(
      &session.id,
      ChatSessionPatch { messages: Some(messages.clone()) },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.messages, messages);

  let fetched = s.get_chat_session(&session.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
  assert_eq!(s.list_chat_sessions().await.unwrap(), vec![fetched]);

  assert!(s.delete_chat_session(&session.id).await.unwrap());
  assert!(s.list_chat_sessions().await.unwrap().is_empty());
}

// ─── Seeding & persistence ───────────────────────────────────────────────────

#[tokio::test]
async fn seed_if_empty_loads_once() {
  let s = store().await;
  let ds = Dataset::sample();

  assert!(s.seed_if_empty(ds.clone()).await.unwrap());
  assert!(!s.seed_if_empty(ds.clone()).await.unwrap());
  assert_eq!(s.snapshot().await.unwrap(), ds);
}

#[tokio::test]
async fn seed_skipped_when_store_has_data() {
  let s = store().await;
  s.create_object(named("Existing")).await.unwrap();

  assert!(!s.seed_if_empty(Dataset::sample()).await.unwrap());
  assert_eq!(s.list_objects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn data_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("ods-store-{}", uuid_like()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("ods.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_object(named("Persisted")).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let obj = s.get_object(&id).await.unwrap().unwrap();
  assert_eq!(obj.name, "Persisted");

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}

fn uuid_like() -> String { ObjectId::generate().into_inner() }
