//! A point-in-time copy of the three modelling collections, plus the built-in
//! sample data.
//!
//! [`Dataset`] is what reports render from and what stores can be seeded
//! with. References are resolved through [`Dataset::object`]; a dangling id
//! simply resolves to `None`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  hierarchy::HierarchyRecord,
  id::ObjectId,
  object::{Attributes, ObjectKind, ObjectRecord, Scalar, TableColumn, TableData},
  relation::RelationRecord,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
  pub objects:     Vec<ObjectRecord>,
  pub relations:   Vec<RelationRecord>,
  pub hierarchies: Vec<HierarchyRecord>,
}

impl Dataset {
  /// Resolve a soft reference. `None` if the object no longer exists.
  pub fn object(&self, id: &ObjectId) -> Option<&ObjectRecord> {
    self.objects.iter().find(|o| &o.id == id)
  }

  /// Display name for a referenced object, `"Unknown"` when dangling.
  pub fn object_name(&self, id: &ObjectId) -> &str {
    self.object(id).map_or("Unknown", |o| o.name.as_str())
  }

  /// Hierarchies grouped by parent, preserving first-seen parent order.
  /// Root-level groupings (no parent) are keyed by `None`.
  pub fn hierarchies_by_parent(
    &self,
  ) -> Vec<(Option<&ObjectId>, Vec<&HierarchyRecord>)> {
    let mut slots: HashMap<Option<&ObjectId>, usize> = HashMap::new();
    let mut groups: Vec<(Option<&ObjectId>, Vec<&HierarchyRecord>)> = Vec::new();
    for h in &self.hierarchies {
      let key = h.parent_object_id.as_ref();
      let slot = *slots.entry(key).or_insert_with(|| {
        groups.push((key, Vec::new()));
        groups.len() - 1
      });
      groups[slot].1.push(h);
    }
    groups
  }

  /// The four objects, two relations and one hierarchy the system ships
  /// with for demos. The hierarchy deliberately points at two child ids that
  /// have no object.
  pub fn sample() -> Self {
    let objects = vec![
      ObjectRecord {
        id:            "obj1".into(),
        name:          "User Management System".into(),
        description:   "Comprehensive user management and authentication \
                        system with role-based access control and audit \
                        logging capabilities."
          .into(),
        kind:          ObjectKind::Item,
        attributes:    attrs(&[("status", "Active"), ("version", "2.1.0")]),
        tables:        vec![TableData {
          name:    "User Permissions".into(),
          columns: ["User ID", "Username", "Role", "Permissions", "Last Login"]
            .into_iter()
            .map(TableColumn::new)
            .collect(),
          data:    vec![
            row(&["USR001", "admin@company.com", "Administrator", "Full Access", "2024-01-15 09:30"]),
            row(&["USR002", "manager@company.com", "Manager", "Read/Write", "2024-01-14 16:45"]),
            row(&["USR003", "user@company.com", "User", "Read Only", "2024-01-13 11:20"]),
          ],
        }],
        created_date:  at(2023, 10, 15, 14, 30),
        modified_date: at(2024, 1, 15, 9, 45),
        revision:      15,
      },
      ObjectRecord {
        id:            "obj2".into(),
        name:          "Product Catalog".into(),
        description:   "Complete product information system with pricing and \
                        inventory tracking."
          .into(),
        kind:          ObjectKind::Document,
        attributes:    attrs(&[("status", "Active"), ("itemCount", "1,247")]),
        tables:        Vec::new(),
        created_date:  at(2023, 11, 1, 10, 0),
        modified_date: at(2024, 1, 12, 14, 20),
        revision:      8,
      },
      ObjectRecord {
        id:            "obj3".into(),
        name:          "Configuration".into(),
        description:   "System configuration and settings management.".into(),
        kind:          ObjectKind::Item,
        attributes:    attrs(&[("status", "Active"), ("configCount", "87")]),
        tables:        Vec::new(),
        created_date:  at(2023, 9, 20, 16, 15),
        modified_date: at(2024, 1, 10, 11, 30),
        revision:      23,
      },
      ObjectRecord {
        id:            "obj4".into(),
        name:          "API Documentation".into(),
        description:   "Complete API reference and integration guides.".into(),
        kind:          ObjectKind::Document,
        attributes:    attrs(&[("status", "Draft"), ("pageCount", "156")]),
        tables:        Vec::new(),
        created_date:  at(2023, 12, 1, 9, 0),
        modified_date: at(2024, 1, 8, 13, 45),
        revision:      5,
      },
    ];

    let relations = vec![
      RelationRecord {
        id:                   "rel1".into(),
        primary_object_id:    "obj1".into(),
        secondary_object_ids: vec!["obj2".into()],
        relation_type:        "Item-to-Document".into(),
        description:          Some(
          "User management connects to product catalog for user-specific \
           product access"
            .into(),
        ),
      },
      RelationRecord {
        id:                   "rel2".into(),
        primary_object_id:    "obj1".into(),
        secondary_object_ids: vec!["obj3".into()],
        relation_type:        "Item-to-Item".into(),
        description:          Some(
          "User management uses system configuration for authentication \
           settings"
            .into(),
        ),
      },
    ];

    let mut properties = attrs(&[("type", "Root")]);
    properties.insert("priority".into(), Scalar::Int(1));
    let hierarchies = vec![HierarchyRecord {
      id:               "hier1".into(),
      parent_object_id: Some("obj1".into()),
      child_object_ids: vec!["auth-module".into(), "perm-manager".into()],
      level:            0,
      properties,
    }];

    Self { objects, relations, hierarchies }
  }
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
  pairs
    .iter()
    .map(|(k, v)| ((*k).to_owned(), Scalar::from(*v)))
    .collect()
}

fn row(cells: &[&str]) -> Vec<Scalar> {
  cells.iter().copied().map(Scalar::from).collect()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
  NaiveDate::from_ymd_opt(year, month, day)
    .and_then(|d| d.and_hms_opt(hour, minute, 0))
    .map(|dt| dt.and_utc())
    .unwrap_or_default()
}
