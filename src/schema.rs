use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key to value-type declaration used to bulk-initialize a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(BTreeMap<String, String>);

impl Schema {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert
  pub fn with(mut self, key: impl Into<String>, type_name: impl Into<String>) -> Self {
    self.insert(key, type_name);
    self
  }

  /// Declare `key` as holding `type_name`, returning the previous declaration
  pub fn insert(&mut self, key: impl Into<String>, type_name: impl Into<String>) -> Option<String> {
    self.0.insert(key.into(), type_name.into())
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  /// Pairs of key and type name, sorted by key
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Schema {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Schema(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}

impl fmt::Display for Schema {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{{")?;
    for (key, type_name) in self.iter() {
      writeln!(f, "\t{}: {}", key, type_name)?;
    }
    write!(f, "}}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display() {
    let schema = Schema::new().with("b", "list").with("a", "str");
    assert_eq!(schema.to_string(), "{\n\ta: str\n\tb: list\n}");
    assert_eq!(Schema::new().to_string(), "{\n}");
  }

  #[test]
  fn test_from_iter_and_get() {
    let schema: Schema = [("x", "str"), ("y", "hash")].into_iter().collect();
    assert_eq!(schema.len(), 2);
    assert_eq!(schema.get("y"), Some("hash"));
    assert_eq!(schema.get("z"), None);
  }

  #[test]
  fn test_serde_is_a_plain_table() {
    let schema = Schema::new().with("x", "str");
    assert_eq!(serde_json::to_string(&schema).unwrap(), r#"{"x":"str"}"#);

    let parsed: Schema = toml::from_str("x = \"str\"\ny = \"zset\"\n").unwrap();
    assert_eq!(parsed.get("y"), Some("zset"));
  }
}
