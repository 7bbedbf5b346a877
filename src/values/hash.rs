//! `hash` value type

use std::collections::{BTreeMap, HashMap};

use serde_json::value::RawValue;

use crate::datum::{Datum, expect_at_least, expect_len, str_param, str_params};
use crate::error::Result;
use crate::registry::Registry;
use crate::value::{ActionTable, Value, from_raw, to_raw};

/// Type name of the hash value
pub const TYPE: &str = "hash";

/// Inserts or overwrites a key-value pair. Returns the key.
pub const INSERT: &str = "INSERT";
/// Removes the key(s). Returns the removed keys.
pub const REMOVE: &str = "REMOVE";
/// Checks whether a key is present. Returns a bool.
pub const HAS: &str = "HAS";
/// Returns the number of pairs as an integer.
pub const LEN: &str = "LEN";
/// Gets the values of the given key(s), an empty string for absent keys.
/// Returns a list.
pub const GET: &str = "GET";
/// Returns every key, sorted.
pub const KEYS: &str = "KEYS";
/// Returns a copy of the whole map.
pub const MAP: &str = "MAP";

pub fn register(registry: &mut Registry) {
  registry.register(construct);
}

fn construct() -> Box<dyn Value> {
  Box::new(Hash::default())
}

/// A string to string hash map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hash(HashMap<String, String>);

impl Hash {
  fn insert(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 2)?;
    let key = str_param(params, 0)?;
    let value = str_param(params, 1)?;

    self.0.insert(key.to_string(), value.to_string());
    Ok(Datum::from(key))
  }

  fn remove(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let keys = str_params(params)?;
    for key in &keys {
      self.0.remove(key);
    }
    Ok(Datum::List(keys))
  }

  fn has(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 1)?;
    Ok(Datum::Bool(self.0.contains_key(str_param(params, 0)?)))
  }

  fn len(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::from(self.0.len()))
  }

  fn get(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let values = str_params(params)?
      .iter()
      .map(|key| self.0.get(key).cloned().unwrap_or_default())
      .collect();
    Ok(Datum::List(values))
  }

  fn keys(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    let mut keys: Vec<String> = self.0.keys().cloned().collect();
    keys.sort_unstable();
    Ok(Datum::List(keys))
  }

  fn map(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::Map(self.0.clone()))
  }
}

impl Value for Hash {
  fn type_name(&self) -> &'static str {
    TYPE
  }

  fn action_table(&self) -> ActionTable {
    ActionTable::new()
      .with(INSERT, Hash::insert)
      .with(REMOVE, Hash::remove)
      .with(HAS, Hash::has)
      .with(LEN, Hash::len)
      .with(GET, Hash::get)
      .with(KEYS, Hash::keys)
      .with(MAP, Hash::map)
  }

  fn to_json(&self) -> Result<Box<RawValue>> {
    let sorted: BTreeMap<_, _> = self.0.iter().collect();
    to_raw(TYPE, &sorted)
  }

  fn from_json(&mut self, data: &RawValue) -> Result<()> {
    self.0 = from_raw(TYPE, data)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::store::Store;

  const KEY: &str = "h";

  fn list(items: &[&str]) -> Datum {
    Datum::List(items.iter().map(|s| s.to_string()).collect())
  }

  fn new_store() -> Store {
    let store = Store::new();
    store.add_key(KEY, TYPE).unwrap();
    store
      .execute(KEY, INSERT, &["b".into(), "2".into()])
      .unwrap();
    store
      .execute(KEY, INSERT, &["a".into(), "1".into()])
      .unwrap();
    store
  }

  #[test]
  fn test_insert_and_get() {
    let store = new_store();
    assert_eq!(
      store.execute(KEY, INSERT, &["a".into(), "one".into()]).unwrap(),
      Datum::from("a")
    );
    assert_eq!(
      store.execute(KEY, GET, &["a".into(), "b".into(), "c".into()]).unwrap(),
      list(&["one", "2", ""])
    );
    assert_eq!(store.execute(KEY, LEN, &[]).unwrap(), Datum::Int(2));
    assert_eq!(store.execute(KEY, KEYS, &[]).unwrap(), list(&["a", "b"]));
    assert_eq!(store.execute(KEY, HAS, &["b".into()]).unwrap(), Datum::Bool(true));
  }

  #[test]
  fn test_remove_and_map() {
    let store = new_store();
    assert_eq!(store.execute(KEY, REMOVE, &["b".into()]).unwrap(), list(&["b"]));

    let map = store.execute(KEY, MAP, &[]).unwrap();
    let map = map.as_map().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("a").map(String::as_str), Some("1"));
  }

  #[test]
  fn test_param_errors() {
    let store = new_store();
    assert!(matches!(
      store.execute(KEY, INSERT, &["a".into()]),
      Err(Error::ParamLength { got: 1, want: 2 })
    ));
    assert!(matches!(
      store.execute(KEY, INSERT, &["a".into(), 1.into()]),
      Err(Error::ParamType { index: 1, .. })
    ));
    assert!(matches!(
      store.execute(KEY, GET, &[]),
      Err(Error::ParamLength { .. })
    ));
    assert!(matches!(
      store.execute(KEY, MAP, &["x".into()]),
      Err(Error::ParamLength { got: 1, want: 0 })
    ));
  }

  #[test]
  fn test_json() {
    let store = new_store();
    assert_eq!(store.to_json(KEY).unwrap().get(), r#"{"a":"1","b":"2"}"#);

    store.from_json_str(KEY, r#"{"z":"26"}"#).unwrap();
    assert_eq!(store.execute(KEY, KEYS, &[]).unwrap(), list(&["z"]));
    assert!(store.from_json_str(KEY, r#"["z"]"#).is_err());
  }
}
