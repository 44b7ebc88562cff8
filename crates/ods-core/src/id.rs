//! Opaque record identifiers.
//!
//! Every id is a plain string on the wire. Freshly generated ids are v4 UUIDs
//! in hyphenated form, but any non-empty string (e.g. the seed id `obj1`) is a
//! valid id. Relations and hierarchies hold [`ObjectId`]s as soft references:
//! nothing guarantees the referenced object still exists.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      /// Generate a fresh random id.
      pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

      pub fn as_str(&self) -> &str { &self.0 }

      pub fn into_inner(self) -> String { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self { Self(s) }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self { Self(s.to_owned()) }
    }

    impl Borrow<str> for $name {
      fn borrow(&self) -> &str { &self.0 }
    }

    impl AsRef<str> for $name {
      fn as_ref(&self) -> &str { &self.0 }
    }
  };
}

string_id!(
  /// Identifies an [`ObjectRecord`](crate::object::ObjectRecord).
  ObjectId
);
string_id!(
  /// Identifies a [`RelationRecord`](crate::relation::RelationRecord).
  RelationId
);
string_id!(
  /// Identifies a [`HierarchyRecord`](crate::hierarchy::HierarchyRecord).
  HierarchyId
);
string_id!(
  /// Identifies a [`ChatSessionRecord`](crate::chat::ChatSessionRecord).
  SessionId
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_ids_are_unique_uuids() {
    let a = ObjectId::generate();
    let b = ObjectId::generate();
    assert_ne!(a, b);
    assert!(Uuid::parse_str(a.as_str()).is_ok());
  }

  #[test]
  fn ids_serialize_as_bare_strings() {
    let id = RelationId::from("rel1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"rel1\"");
    let back: RelationId = serde_json::from_str("\"rel1\"").unwrap();
    assert_eq!(back, id);
  }
}
