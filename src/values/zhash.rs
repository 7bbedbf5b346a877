//! `zhash` value type
//!
//! A hash whose elements each carry a string value and an integer score.
//! Elements are ordered by score the same way as in a `zset`.

use std::collections::BTreeMap;

use serde_json::value::RawValue;

use crate::datum::{
  Datum, ScoredItem, expect_at_least, expect_len, int_param, str_param, str_params,
};
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::value::{ActionTable, Value, from_raw, to_raw};

use super::sorted::SortedSet;
use super::zset::{add_score, no_such_element};

/// Type name of the zhash value
pub const TYPE: &str = "zhash";

/// Inserts an element with score 0 and an optional value. Returns the element.
/// Without a value the element holds the empty string.
pub const INSERT: &str = "INSERT";
/// Removes the element(s). Returns the removed elements.
pub const REMOVE: &str = "REMOVE";
/// Adds to the score of an element. Returns the new score.
pub const INCREMENT: &str = "INCREMENT";
/// Returns the number of elements as an integer.
pub const LEN: &str = "LEN";
/// Returns the value and score of an element as an item.
pub const GET: &str = "GET";
/// Sets the value of an existing element, keeping its score. Returns the element.
pub const SET: &str = "SET";
/// Returns the element with the highest score, nil when empty.
pub const PEEKMAX: &str = "PEEKMAX";
/// Returns the element with the lowest score, nil when empty.
pub const PEEKMIN: &str = "PEEKMIN";

pub fn register(registry: &mut Registry) {
  registry.register(construct);
}

fn construct() -> Box<dyn Value> {
  Box::new(ZHash::default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZHash(SortedSet<String>);

impl ZHash {
  pub fn item(&self, key: &str) -> Option<ScoredItem> {
    self
      .0
      .get(key)
      .map(|(score, value)| ScoredItem::new(value.as_str(), score))
  }

  fn insert(&mut self, params: &[Datum]) -> Result<Datum> {
    if params.is_empty() || params.len() > 2 {
      return Err(Error::param_length(params.len(), 1));
    }
    let key = str_param(params, 0)?;
    let value = match params.len() {
      2 => str_param(params, 1)?,
      _ => "",
    };

    self.0.add_or_update(key, 0, value.to_string());
    Ok(Datum::from(key))
  }

  fn set(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 2)?;
    let key = str_param(params, 0)?;
    let value = str_param(params, 1)?;

    let score = self.0.get(key).ok_or_else(|| no_such_element(key))?.0;
    self.0.add_or_update(key, score, value.to_string());
    Ok(Datum::from(key))
  }

  fn remove(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let keys = str_params(params)?;
    if let Some(missing) = keys.iter().find(|key| !self.0.contains(key)) {
      return Err(no_such_element(missing));
    }

    for key in &keys {
      self.0.remove(key);
    }
    Ok(Datum::List(keys))
  }

  fn increment(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 2)?;
    let key = str_param(params, 0)?;
    let by = int_param(params, 1)?;

    let current = self.0.get(key).ok_or_else(|| no_such_element(key))?.0;
    let score = add_score(key, current, by)?;
    if let Some((_, value)) = self.0.remove(key) {
      self.0.add_or_update(key, score, value);
    }
    Ok(Datum::Int(score))
  }

  fn len(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::from(self.0.len()))
  }

  fn get(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 1)?;
    let key = str_param(params, 0)?;
    let item = self.item(key).ok_or_else(|| no_such_element(key))?;
    Ok(Datum::Item(item))
  }

  fn peek_max(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::from(self.0.peek_max().map(|(key, _, _)| key)))
  }

  fn peek_min(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::from(self.0.peek_min().map(|(key, _, _)| key)))
  }
}

impl Value for ZHash {
  fn type_name(&self) -> &'static str {
    TYPE
  }

  fn action_table(&self) -> ActionTable {
    ActionTable::new()
      .with(INSERT, ZHash::insert)
      .with(REMOVE, ZHash::remove)
      .with(INCREMENT, ZHash::increment)
      .with(LEN, ZHash::len)
      .with(GET, ZHash::get)
      .with(SET, ZHash::set)
      .with(PEEKMAX, ZHash::peek_max)
      .with(PEEKMIN, ZHash::peek_min)
  }

  fn to_json(&self) -> Result<Box<RawValue>> {
    let items: BTreeMap<&str, ScoredItem> = self
      .0
      .iter()
      .map(|(key, score, value)| (key, ScoredItem::new(value.as_str(), score)))
      .collect();
    to_raw(TYPE, &items)
  }

  fn from_json(&mut self, data: &RawValue) -> Result<()> {
    let items: BTreeMap<String, ScoredItem> = from_raw(TYPE, data)?;
    self.0.clear();
    for (key, item) in items {
      self.0.add_or_update(&key, item.score, item.value);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::Store;

  const KEY: &str = "zh";

  fn new_store() -> Store {
    let store = Store::new();
    store.add_key(KEY, TYPE).unwrap();
    store
      .execute(KEY, INSERT, &["a".into(), "apple".into()])
      .unwrap();
    store.execute(KEY, INSERT, &["b".into()]).unwrap();
    store
  }

  #[test]
  fn test_insert_get_set() {
    let store = new_store();
    assert_eq!(
      store.execute(KEY, GET, &["a".into()]).unwrap(),
      Datum::Item(ScoredItem::new("apple", 0))
    );
    assert_eq!(
      store.execute(KEY, GET, &["b".into()]).unwrap(),
      Datum::Item(ScoredItem::new("", 0))
    );

    store
      .execute(KEY, INCREMENT, &["a".into(), 4.into()])
      .unwrap();
    assert_eq!(
      store.execute(KEY, SET, &["a".into(), "avocado".into()]).unwrap(),
      Datum::from("a")
    );
    assert_eq!(
      store.execute(KEY, GET, &["a".into()]).unwrap(),
      Datum::Item(ScoredItem::new("avocado", 4))
    );
  }

  #[test]
  fn test_increment_keeps_value() {
    let store = new_store();
    assert_eq!(
      store.execute(KEY, INCREMENT, &["a".into(), 2.into()]).unwrap(),
      Datum::Int(2)
    );
    assert_eq!(
      store.execute(KEY, INCREMENT, &["a".into(), 3.into()]).unwrap(),
      Datum::Int(5)
    );
    assert_eq!(
      store.execute(KEY, GET, &["a".into()]).unwrap(),
      Datum::Item(ScoredItem::new("apple", 5))
    );
    assert_eq!(store.execute(KEY, PEEKMAX, &[]).unwrap(), Datum::from("a"));
    assert_eq!(store.execute(KEY, PEEKMIN, &[]).unwrap(), Datum::from("b"));
  }

  #[test]
  fn test_increment_overflow_keeps_element() {
    let store = new_store();
    store
      .execute(KEY, INCREMENT, &["a".into(), i64::MIN.into()])
      .unwrap();
    assert!(matches!(
      store.execute(KEY, INCREMENT, &["a".into(), (-1).into()]),
      Err(Error::ParamValue(_))
    ));
    assert_eq!(
      store.execute(KEY, GET, &["a".into()]).unwrap(),
      Datum::Item(ScoredItem::new("apple", i64::MIN))
    );
    assert_eq!(store.execute(KEY, LEN, &[]).unwrap(), Datum::Int(2));
  }

  #[test]
  fn test_errors() {
    let store = new_store();
    assert!(matches!(
      store.execute(KEY, INSERT, &[]),
      Err(Error::ParamLength { got: 0, want: 1 })
    ));
    assert!(matches!(
      store.execute(KEY, INSERT, &["a".into(), "b".into(), "c".into()]),
      Err(Error::ParamLength { got: 3, .. })
    ));
    assert!(matches!(
      store.execute(KEY, SET, &["zz".into(), "v".into()]),
      Err(Error::ParamValue(_))
    ));
    assert!(matches!(
      store.execute(KEY, REMOVE, &["zz".into()]),
      Err(Error::ParamValue(_))
    ));
    assert!(matches!(
      store.execute(KEY, SET, &["a".into(), 1.into()]),
      Err(Error::ParamType { index: 1, .. })
    ));
  }

  #[test]
  fn test_json() {
    let store = new_store();
    store
      .execute(KEY, INCREMENT, &["b".into(), 1.into()])
      .unwrap();
    assert_eq!(
      store.to_json(KEY).unwrap().get(),
      r#"{"a":{"value":"apple","score":0},"b":{"value":"","score":1}}"#
    );

    store
      .from_json_str(KEY, r#"{"k":{"value":"v","score":9}}"#)
      .unwrap();
    assert_eq!(store.execute(KEY, LEN, &[]).unwrap(), Datum::Int(1));
    assert_eq!(
      store.execute(KEY, GET, &["k".into()]).unwrap(),
      Datum::Item(ScoredItem::new("v", 9))
    );
  }
}
