//! [`Collection`]: an id-keyed map that iterates in insertion order.

use std::{
  collections::{BTreeMap, HashMap},
  hash::Hash,
};

/// Records keyed by id, listed in the order they were first inserted.
///
/// Each insert takes the next sequence number; `by_seq` holds the records in
/// that order and `seq_of` maps ids onto it. Replacing an existing id keeps
/// its original position.
#[derive(Debug)]
pub struct Collection<K, V> {
  by_seq:   BTreeMap<u64, V>,
  seq_of:   HashMap<K, u64>,
  next_seq: u64,
}

impl<K, V> Default for Collection<K, V> {
  fn default() -> Self {
    Self { by_seq: BTreeMap::new(), seq_of: HashMap::new(), next_seq: 0 }
  }
}

impl<K: Eq + Hash, V> Collection<K, V> {
  pub fn get(&self, id: &K) -> Option<&V> {
    self.seq_of.get(id).and_then(|seq| self.by_seq.get(seq))
  }

  pub fn get_mut(&mut self, id: &K) -> Option<&mut V> {
    let seq = self.seq_of.get(id)?;
    self.by_seq.get_mut(seq)
  }

  /// Insert or replace. A replaced record keeps its position.
  pub fn insert(&mut self, id: K, value: V) {
    let seq = *self.seq_of.entry(id).or_insert_with(|| {
      let seq = self.next_seq;
      self.next_seq += 1;
      seq
    });
    self.by_seq.insert(seq, value);
  }

  pub fn remove(&mut self, id: &K) -> Option<V> {
    let seq = self.seq_of.remove(id)?;
    self.by_seq.remove(&seq)
  }

  pub fn values(&self) -> impl Iterator<Item = &V> { self.by_seq.values() }

  pub fn len(&self) -> usize { self.by_seq.len() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lists_in_insertion_order() {
    let mut c = Collection::default();
    c.insert("b", 2);
    c.insert("a", 1);
    c.insert("c", 3);
    assert_eq!(c.values().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
  }

  #[test]
  fn replace_keeps_position_and_remove_forgets_id() {
    let mut c = Collection::default();
    c.insert("a", 1);
    c.insert("b", 2);
    c.insert("a", 10);
    assert_eq!(c.values().copied().collect::<Vec<_>>(), vec![10, 2]);

    assert_eq!(c.remove(&"a"), Some(10));
    assert_eq!(c.remove(&"a"), None);
    assert_eq!(c.get(&"a"), None);

    c.insert("a", 11);
    assert_eq!(c.values().copied().collect::<Vec<_>>(), vec![2, 11]);
    assert_eq!(c.len(), 2);
  }
}
