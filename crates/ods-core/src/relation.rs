//! Relations: typed, directed links from one object to a set of others.
//!
//! Object ids held here are soft references. Creating a relation never checks
//! that the objects exist, and deleting an object leaves its relations intact.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  id::{ObjectId, RelationId},
  validate::{id_not_blank, not_blank},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
  pub id:                   RelationId,
  pub primary_object_id:    ObjectId,
  pub secondary_object_ids: Vec<ObjectId>,
  /// Free-form tag, e.g. `depends_on` or `Item-to-Document`.
  pub relation_type:        String,
  pub description:          Option<String>,
}

impl RelationRecord {
  pub fn create(input: NewRelation) -> Self {
    Self {
      id:                   RelationId::generate(),
      primary_object_id:    input.primary_object_id,
      secondary_object_ids: input.secondary_object_ids,
      relation_type:        input.relation_type,
      description:          input.description,
    }
  }

  pub fn apply(&mut self, patch: RelationPatch) {
    if let Some(primary) = patch.primary_object_id {
      self.primary_object_id = primary;
    }
    if let Some(secondary) = patch.secondary_object_ids {
      self.secondary_object_ids = secondary;
    }
    if let Some(relation_type) = patch.relation_type {
      self.relation_type = relation_type;
    }
    if let Some(description) = patch.description {
      self.description = Some(description);
    }
  }

  /// `true` if `object_id` is the primary object or one of the secondaries.
  pub fn involves(&self, object_id: &ObjectId) -> bool {
    &self.primary_object_id == object_id
      || self.secondary_object_ids.contains(object_id)
  }
}

/// Input to [`crate::store::EntityStore::create_relation`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRelation {
  #[validate(custom(function = "id_not_blank"))]
  pub primary_object_id:    ObjectId,
  #[serde(default)]
  pub secondary_object_ids: Vec<ObjectId>,
  #[validate(custom(function = "not_blank"))]
  pub relation_type:        String,
  pub description:          Option<String>,
}

impl NewRelation {
  pub fn new(
    primary_object_id: ObjectId,
    secondary_object_ids: Vec<ObjectId>,
    relation_type: impl Into<String>,
  ) -> Self {
    Self {
      primary_object_id,
      secondary_object_ids,
      relation_type: relation_type.into(),
      description: None,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RelationPatch {
  #[validate(custom(function = "id_not_blank"))]
  pub primary_object_id:    Option<ObjectId>,
  pub secondary_object_ids: Option<Vec<ObjectId>>,
  #[validate(custom(function = "not_blank"))]
  pub relation_type:        Option<String>,
  pub description:          Option<String>,
}
