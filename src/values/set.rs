//! `set` value type

use std::collections::HashSet;

use serde_json::value::RawValue;

use crate::datum::{Datum, expect_at_least, expect_len, str_param, str_params};
use crate::error::Result;
use crate::registry::Registry;
use crate::value::{ActionTable, Value, from_raw, to_raw};

/// Type name of the set value
pub const TYPE: &str = "set";

/// Inserts the string(s). Returns the inserted strings.
pub const INSERT: &str = "INSERT";
/// Removes the string(s). Returns the removed strings.
pub const REMOVE: &str = "REMOVE";
/// Checks membership of a single string. Returns a bool.
pub const HAS: &str = "HAS";
/// Returns the number of elements as an integer.
pub const LEN: &str = "LEN";
/// Returns every element, sorted.
pub const GET: &str = "GET";

pub fn register(registry: &mut Registry) {
  registry.register(construct);
}

fn construct() -> Box<dyn Value> {
  Box::new(Set::default())
}

/// An unordered set of strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Set(HashSet<String>);

impl Set {
  pub fn contains(&self, item: &str) -> bool {
    self.0.contains(item)
  }

  fn sorted(&self) -> Vec<String> {
    let mut items: Vec<String> = self.0.iter().cloned().collect();
    items.sort_unstable();
    items
  }

  fn insert(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let items = str_params(params)?;
    self.0.extend(items.iter().cloned());
    Ok(Datum::List(items))
  }

  fn remove(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let items = str_params(params)?;
    for item in &items {
      self.0.remove(item);
    }
    Ok(Datum::List(items))
  }

  fn has(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 1)?;
    Ok(Datum::Bool(self.0.contains(str_param(params, 0)?)))
  }

  fn len(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::from(self.0.len()))
  }

  fn get(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::List(self.sorted()))
  }
}

impl Value for Set {
  fn type_name(&self) -> &'static str {
    TYPE
  }

  fn action_table(&self) -> ActionTable {
    ActionTable::new()
      .with(INSERT, Set::insert)
      .with(REMOVE, Set::remove)
      .with(HAS, Set::has)
      .with(LEN, Set::len)
      .with(GET, Set::get)
  }

  fn to_json(&self) -> Result<Box<RawValue>> {
    to_raw(TYPE, &self.sorted())
  }

  fn from_json(&mut self, data: &RawValue) -> Result<()> {
    let items: Vec<String> = from_raw(TYPE, data)?;
    self.0 = items.into_iter().collect();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::store::Store;

  const KEY: &str = "s";

  fn list(items: &[&str]) -> Datum {
    Datum::List(items.iter().map(|s| s.to_string()).collect())
  }

  fn new_store() -> Store {
    let store = Store::new();
    store.add_key(KEY, TYPE).unwrap();
    store
  }

  #[test]
  fn test_insert_has_remove() {
    let store = new_store();
    assert_eq!(
      store
        .execute(KEY, INSERT, &["b".into(), "a".into(), "b".into()])
        .unwrap(),
      list(&["b", "a", "b"])
    );
    assert_eq!(store.execute(KEY, LEN, &[]).unwrap(), Datum::Int(2));
    assert_eq!(store.execute(KEY, GET, &[]).unwrap(), list(&["a", "b"]));
    assert_eq!(store.execute(KEY, HAS, &["a".into()]).unwrap(), Datum::Bool(true));

    assert_eq!(
      store.execute(KEY, REMOVE, &["a".into(), "zz".into()]).unwrap(),
      list(&["a", "zz"])
    );
    assert_eq!(store.execute(KEY, HAS, &["a".into()]).unwrap(), Datum::Bool(false));
  }

  #[test]
  fn test_param_errors() {
    let store = new_store();
    assert!(matches!(
      store.execute(KEY, INSERT, &[]),
      Err(Error::ParamLength { got: 0, want: 1 })
    ));
    assert!(matches!(
      store.execute(KEY, INSERT, &["a".into(), 2.into()]),
      Err(Error::ParamType { index: 1, .. })
    ));
    assert!(matches!(
      store.execute(KEY, HAS, &["a".into(), "b".into()]),
      Err(Error::ParamLength { got: 2, want: 1 })
    ));
    assert!(matches!(
      store.execute(KEY, LEN, &["a".into()]),
      Err(Error::ParamLength { got: 1, want: 0 })
    ));
  }

  #[test]
  fn test_json_is_sorted_and_replaces() {
    let store = new_store();
    store
      .execute(KEY, INSERT, &["c".into(), "a".into(), "b".into()])
      .unwrap();
    assert_eq!(store.to_json(KEY).unwrap().get(), r#"["a","b","c"]"#);

    store.from_json_str(KEY, r#"["x","y"]"#).unwrap();
    assert_eq!(store.execute(KEY, GET, &[]).unwrap(), list(&["x", "y"]));
  }
}
