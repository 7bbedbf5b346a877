//! `zset` value type

use std::collections::BTreeMap;

use serde_json::value::RawValue;

use crate::datum::{Datum, expect_at_least, expect_len, int_param, str_param, str_params};
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::value::{ActionTable, Value, from_raw, to_raw};

use super::sorted::SortedSet;

/// Type name of the zset value
pub const TYPE: &str = "zset";

/// Inserts the element(s) with score 0, resetting the score of present
/// elements. Returns the inserted elements.
pub const INSERT: &str = "INSERT";
/// Removes the element(s). Returns the removed elements.
pub const REMOVE: &str = "REMOVE";
/// Adds to the score of an element. Returns the new score.
pub const INCREMENT: &str = "INCREMENT";
/// Returns the number of elements as an integer.
pub const LEN: &str = "LEN";
/// Returns the score of an element.
pub const GET: &str = "GET";
/// Returns the element with the highest score, nil when empty.
pub const PEEKMAX: &str = "PEEKMAX";
/// Returns the element with the lowest score, nil when empty.
pub const PEEKMIN: &str = "PEEKMIN";

pub fn register(registry: &mut Registry) {
  registry.register(construct);
}

fn construct() -> Box<dyn Value> {
  Box::new(ZSet::default())
}

pub(crate) fn no_such_element(key: &str) -> Error {
  Error::ParamValue(format!("no such element: {}", key))
}

/// Adds `by` to the score of `key`, failing instead of overflowing
pub(crate) fn add_score(key: &str, score: i64, by: i64) -> Result<i64> {
  score
    .checked_add(by)
    .ok_or_else(|| Error::ParamValue(format!("score of {} overflows: {} + {}", key, score, by)))
}

/// A set of elements ordered by integer score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZSet(SortedSet<()>);

impl ZSet {
  pub fn score(&self, key: &str) -> Option<i64> {
    self.0.get(key).map(|(score, _)| score)
  }

  fn insert(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let keys = str_params(params)?;
    for key in &keys {
      self.0.add_or_update(key, 0, ());
    }
    Ok(Datum::List(keys))
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

    let score = self.score(key).ok_or_else(|| no_such_element(key))?;
    let score = add_score(key, score, by)?;
    self.0.add_or_update(key, score, ());
    Ok(Datum::Int(score))
  }

  fn len(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 0)?;
    Ok(Datum::from(self.0.len()))
  }

  fn get(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_len(params, 1)?;
    let key = str_param(params, 0)?;
    let score = self.score(key).ok_or_else(|| no_such_element(key))?;
    Ok(Datum::Int(score))
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

impl Value for ZSet {
  fn type_name(&self) -> &'static str {
    TYPE
  }

  fn action_table(&self) -> ActionTable {
    ActionTable::new()
      .with(INSERT, ZSet::insert)
      .with(REMOVE, ZSet::remove)
      .with(INCREMENT, ZSet::increment)
      .with(LEN, ZSet::len)
      .with(GET, ZSet::get)
      .with(PEEKMAX, ZSet::peek_max)
      .with(PEEKMIN, ZSet::peek_min)
  }

  fn to_json(&self) -> Result<Box<RawValue>> {
    let scores: BTreeMap<&str, i64> = self.0.iter().map(|(key, score, _)| (key, score)).collect();
    to_raw(TYPE, &scores)
  }

  fn from_json(&mut self, data: &RawValue) -> Result<()> {
    let scores: BTreeMap<String, i64> = from_raw(TYPE, data)?;
    self.0.clear();
    for (key, score) in scores {
      self.0.add_or_update(&key, score, ());
    }
    Ok(())
  }
}
