//! `list` value type

use serde_json::value::RawValue;

use crate::datum::{Datum, expect_at_least, int_param, str_param, str_params};
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::value::{ActionTable, Value, from_raw, to_raw};

/// Type name of the list value
pub const TYPE: &str = "list";

/// Gets the string at an index, or the last string if no index is given.
/// Returns a string.
pub const GET: &str = "GET";
/// Sets the string at an index, or the last string if only the string is
/// given. Returns the string set.
pub const SET: &str = "SET";
/// Gets the strings in `[start, end)`. With one parameter it is the end,
/// with none the whole list. Returns a list.
pub const SLICE: &str = "SLICE";
/// Returns the length as an integer.
pub const LEN: &str = "LEN";
/// Adds strings to the end. Returns the appended strings.
pub const APPEND: &str = "APPEND";
/// Removes the last `n` strings, one if `n` is not given. Returns the removed
/// strings.
pub const POP: &str = "POP";
/// Removes a string, either by value or by index. Returns the removed string.
pub const REMOVE: &str = "REMOVE";
/// Returns the index of the first matching string, or -1.
pub const FIND: &str = "FIND";

pub fn register(registry: &mut Registry) {
  registry.register(construct);
}

fn construct() -> Box<dyn Value> {
  Box::new(List::default())
}

/// An ordered list of strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List(Vec<String>);

impl List {
  pub fn new(items: Vec<String>) -> Self {
    Self(items)
  }

  pub fn items(&self) -> &[String] {
    &self.0
  }

  /// Validates `index` as a position of an existing element
  fn position(&self, index: i64) -> Result<usize> {
    if index < 0 || index as usize >= self.0.len() {
      return Err(Error::InvalidIndex {
        index,
        len: self.0.len(),
      });
    }
    Ok(index as usize)
  }

  fn last(&self) -> i64 {
    self.0.len() as i64 - 1
  }

  fn get(&mut self, params: &[Datum]) -> Result<Datum> {
    let index = if params.is_empty() {
      self.last()
    } else {
      int_param(params, 0)?
    };
    let pos = self.position(index)?;
    Ok(Datum::Str(self.0[pos].clone()))
  }

  fn set(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;

    let (index, item) = match params.len() {
      1 => (self.last(), str_param(params, 0)?),
      _ => (int_param(params, 0)?, str_param(params, 1)?),
    };
    let pos = self.position(index)?;

    self.0[pos] = item.to_string();
    Ok(Datum::Str(item.to_string()))
  }

  fn slice(&mut self, params: &[Datum]) -> Result<Datum> {
    let len = self.0.len();

    let (start, end) = match params.len() {
      0 => (0, len),
      1 => {
        let end = int_param(params, 0)?;
        if end < 0 || end as usize > len {
          return Err(Error::InvalidIndex { index: end, len });
        }
        (0, end as usize)
      }
      _ => {
        let start = int_param(params, 0)?;
        let end = int_param(params, 1)?;
        if start > end || start < 0 || end as usize > len {
          return Err(Error::InvalidRange { start, end, len });
        }
        (start as usize, end as usize)
      }
    };

    Ok(Datum::List(self.0[start..end].to_vec()))
  }

  fn len(&mut self, _params: &[Datum]) -> Result<Datum> {
    Ok(Datum::from(self.0.len()))
  }

  fn append(&mut self, params: &[Datum]) -> Result<Datum> {
    let items = str_params(params)?;
    self.0.extend(items.iter().cloned());
    Ok(Datum::List(items))
  }

  fn pop(&mut self, params: &[Datum]) -> Result<Datum> {
    let n = if params.is_empty() {
      1
    } else {
      int_param(params, 0)?
    };

    let len = self.0.len();
    if n < 0 || n as usize > len {
      return Err(Error::InvalidIndex { index: n, len });
    }

    let removed = self.0.split_off(len - n as usize);
    Ok(Datum::List(removed))
  }

  fn remove(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;

    match &params[0] {
      Datum::Str(item) => {
        if let Some(pos) = self.0.iter().position(|s| s == item) {
          self.0.remove(pos);
        }
        Ok(Datum::Str(item.clone()))
      }
      Datum::Int(index) => {
        let pos = self.position(*index)?;
        Ok(Datum::Str(self.0.remove(pos)))
      }
      other => Err(Error::ParamType {
        index: 0,
        expected: "string or int",
        got: format!("{:?}", other),
      }),
    }
  }

  fn find(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    let item = str_param(params, 0)?;

    let index = self
      .0
      .iter()
      .position(|s| s == item)
      .map(|pos| pos as i64)
      .unwrap_or(-1);
    Ok(Datum::Int(index))
  }
}

impl Value for List {
  fn type_name(&self) -> &'static str {
    TYPE
  }

  fn action_table(&self) -> ActionTable {
    ActionTable::new()
      .with(GET, List::get)
      .with(SET, List::set)
      .with(SLICE, List::slice)
      .with(LEN, List::len)
      .with(APPEND, List::append)
      .with(POP, List::pop)
      .with(REMOVE, List::remove)
      .with(FIND, List::find)
  }

  fn to_json(&self) -> Result<Box<RawValue>> {
    to_raw(TYPE, &self.0)
  }

  fn from_json(&mut self, data: &RawValue) -> Result<()> {
    self.0 = from_raw(TYPE, data)?;
    Ok(())
  }
}
