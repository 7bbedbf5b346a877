//! Score-ordered collection backing `zset` and `zhash`
//!
//! Elements are unique by key and ordered by ascending score; equal scores
//! are ordered by key. Lookups by key go through a hash map, ordered access
//! goes through a B-tree of `(score, key)` pairs.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node<V> {
  score: i64,
  value: V,
}

/// Set of keyed elements ordered by score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedSet<V> {
  nodes: HashMap<String, Node<V>>,
  order: BTreeSet<(i64, String)>,
}

impl<V> Default for SortedSet<V> {
  fn default() -> Self {
    Self {
      nodes: HashMap::new(),
      order: BTreeSet::new(),
    }
  }
}

impl<V> SortedSet<V> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn contains(&self, key: &str) -> bool {
    self.nodes.contains_key(key)
  }

  /// Score and value of `key`
  pub fn get(&self, key: &str) -> Option<(i64, &V)> {
    self.nodes.get(key).map(|node| (node.score, &node.value))
  }

  /// Insert `key`, or move it to `score` and replace its value
  ///
  /// Returns the previous score and value.
  pub fn add_or_update(&mut self, key: &str, score: i64, value: V) -> Option<(i64, V)> {
    let previous = self.remove(key);
    self.order.insert((score, key.to_string()));
    self.nodes.insert(key.to_string(), Node { score, value });
    previous
  }

  /// Remove `key`, returning its score and value
  pub fn remove(&mut self, key: &str) -> Option<(i64, V)> {
    let node = self.nodes.remove(key)?;
    self.order.remove(&(node.score, key.to_string()));
    Some((node.score, node.value))
  }

  /// Element with the lowest score
  pub fn peek_min(&self) -> Option<(&str, i64, &V)> {
    self.order.first().map(|(_, key)| self.entry(key))
  }

  /// Element with the highest score
  pub fn peek_max(&self) -> Option<(&str, i64, &V)> {
    self.order.last().map(|(_, key)| self.entry(key))
  }

  /// Elements from lowest to highest score
  pub fn iter(&self) -> impl Iterator<Item = (&str, i64, &V)> {
    self.order.iter().map(|(_, key)| self.entry(key))
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.order.clear();
  }

  // keys in `order` always have a node
  fn entry<'a>(&'a self, key: &'a str) -> (&'a str, i64, &'a V) {
    let node = &self.nodes[key];
    (key, node.score, &node.value)
  }
}
