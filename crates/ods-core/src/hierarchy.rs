//! Hierarchies: parent-to-children groupings of objects at a depth level.
//!
//! Same soft-reference rules as relations; cycles are not detected.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  id::{HierarchyId, ObjectId},
  object::Attributes,
  validate::id_not_blank,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyRecord {
  pub id:               HierarchyId,
  /// `None` for a root-level grouping.
  pub parent_object_id: Option<ObjectId>,
  pub child_object_ids: Vec<ObjectId>,
  pub level:            i32,
  pub properties:       Attributes,
}

impl HierarchyRecord {
  pub fn create(input: NewHierarchy) -> Self {
    Self {
      id:               HierarchyId::generate(),
      parent_object_id: input.parent_object_id,
      child_object_ids: input.child_object_ids,
      level:            input.level,
      properties:       input.properties,
    }
  }

  pub fn apply(&mut self, patch: HierarchyPatch) {
    if let Some(parent) = patch.parent_object_id {
      self.parent_object_id = Some(parent);
    }
    if let Some(children) = patch.child_object_ids {
      self.child_object_ids = children;
    }
    if let Some(level) = patch.level {
      self.level = level;
    }
    if let Some(properties) = patch.properties {
      self.properties = properties;
    }
  }

  /// `true` if `object_id` is the parent or one of the children.
  pub fn involves(&self, object_id: &ObjectId) -> bool {
    self.parent_object_id.as_ref() == Some(object_id)
      || self.child_object_ids.contains(object_id)
  }
}

/// Input to [`crate::store::EntityStore::create_hierarchy`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewHierarchy {
  #[validate(custom(function = "id_not_blank"))]
  pub parent_object_id: Option<ObjectId>,
  #[serde(default)]
  pub child_object_ids: Vec<ObjectId>,
  #[serde(default)]
  #[validate(range(min = 0))]
  pub level:            i32,
  #[serde(default)]
  pub properties:       Attributes,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HierarchyPatch {
  #[validate(custom(function = "id_not_blank"))]
  pub parent_object_id: Option<ObjectId>,
  pub child_object_ids: Option<Vec<ObjectId>>,
  #[validate(range(min = 0))]
  pub level:            Option<i32>,
  pub properties:       Option<Attributes>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn empty_payload_creates_root_level_hierarchy() {
    let input: NewHierarchy = serde_json::from_value(json!({})).unwrap();
    assert!(input.validate().is_ok());
    let h = HierarchyRecord::create(input);
    assert_eq!(h.parent_object_id, None);
    assert!(h.child_object_ids.is_empty());
    assert_eq!(h.level, 0);
    assert!(h.properties.is_empty());
  }

  #[test]
  fn negative_level_fails_validation() {
    let input = NewHierarchy { level: -1, ..Default::default() };
    assert!(input.validate().is_err());
  }

  #[test]
  fn involves_matches_parent_and_children() {
    let h = HierarchyRecord::create(NewHierarchy {
      parent_object_id: Some("p".into()),
      child_object_ids: vec!["c1".into(), "c2".into()],
      ..Default::default()
    });
    assert!(h.involves(&"p".into()));
    assert!(h.involves(&"c2".into()));
    assert!(!h.involves(&"x".into()));
  }
}
