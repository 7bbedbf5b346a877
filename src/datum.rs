//! Dynamically typed parameters and results of value actions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A value paired with its score, as held by a `zhash`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredItem {
  pub value: String,
  pub score: i64,
}

impl ScoredItem {
  pub fn new(value: impl Into<String>, score: i64) -> Self {
    Self {
      value: value.into(),
      score,
    }
  }
}

/// Parameter or result of an action
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Datum {
  /// Absence of a result
  #[default]
  Nil,
  Str(String),
  Int(i64),
  Bool(bool),
  /// Sequence of strings
  List(Vec<String>),
  /// String to string mapping
  Map(HashMap<String, String>),
  /// Value and score record
  Item(ScoredItem),
}

impl Datum {
  /// Name of the variant, used in parameter type errors
  pub fn kind(&self) -> &'static str {
    match self {
      Datum::Nil => "nil",
      Datum::Str(_) => "string",
      Datum::Int(_) => "int",
      Datum::Bool(_) => "bool",
      Datum::List(_) => "list",
      Datum::Map(_) => "map",
      Datum::Item(_) => "item",
    }
  }

  pub fn is_nil(&self) -> bool {
    matches!(self, Datum::Nil)
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Datum::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Datum::Int(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Datum::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[String]> {
    match self {
      Datum::List(l) => Some(l),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&HashMap<String, String>> {
    match self {
      Datum::Map(m) => Some(m),
      _ => None,
    }
  }

  pub fn as_item(&self) -> Option<&ScoredItem> {
    match self {
      Datum::Item(item) => Some(item),
      _ => None,
    }
  }
}

impl From<&str> for Datum {
  fn from(s: &str) -> Self {
    Datum::Str(s.to_string())
  }
}

impl From<String> for Datum {
  fn from(s: String) -> Self {
    Datum::Str(s)
  }
}

impl From<i64> for Datum {
  fn from(i: i64) -> Self {
    Datum::Int(i)
  }
}

impl From<i32> for Datum {
  fn from(i: i32) -> Self {
    Datum::Int(i as i64)
  }
}

impl From<usize> for Datum {
  fn from(i: usize) -> Self {
    Datum::Int(i as i64)
  }
}

impl From<bool> for Datum {
  fn from(b: bool) -> Self {
    Datum::Bool(b)
  }
}

impl From<Vec<String>> for Datum {
  fn from(l: Vec<String>) -> Self {
    Datum::List(l)
  }
}

impl From<HashMap<String, String>> for Datum {
  fn from(m: HashMap<String, String>) -> Self {
    Datum::Map(m)
  }
}

impl From<ScoredItem> for Datum {
  fn from(item: ScoredItem) -> Self {
    Datum::Item(item)
  }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
  fn from(opt: Option<T>) -> Self {
    opt.map(Into::into).unwrap_or(Datum::Nil)
  }
}

fn type_error(params: &[Datum], index: usize, expected: &'static str) -> Error {
  Error::ParamType {
    index,
    expected,
    got: format!("{:?}", params[index]),
  }
}

/// Reads the string parameter at `index`
///
/// The caller has already checked that `index` is in bounds.
pub fn str_param(params: &[Datum], index: usize) -> Result<&str> {
  params[index]
    .as_str()
    .ok_or_else(|| type_error(params, index, "string"))
}

/// Reads the integer parameter at `index`
pub fn int_param(params: &[Datum], index: usize) -> Result<i64> {
  params[index]
    .as_int()
    .ok_or_else(|| type_error(params, index, "int"))
}

/// Reads every parameter as a string
pub fn str_params(params: &[Datum]) -> Result<Vec<String>> {
  (0..params.len())
    .map(|i| str_param(params, i).map(str::to_string))
    .collect()
}

/// Fails unless exactly `want` parameters were given
pub fn expect_len(params: &[Datum], want: usize) -> Result<()> {
  if params.len() != want {
    return Err(Error::param_length(params.len(), want));
  }
  Ok(())
}

/// Fails if fewer than `want` parameters were given
pub fn expect_at_least(params: &[Datum], want: usize) -> Result<()> {
  if params.len() < want {
    return Err(Error::param_length(params.len(), want));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_conversions() {
    assert_eq!(Datum::from("a"), Datum::Str("a".to_string()));
    assert_eq!(Datum::from(3), Datum::Int(3));
    assert_eq!(Datum::from(3usize), Datum::Int(3));
    assert_eq!(Datum::from(None::<String>), Datum::Nil);
    assert_eq!(Datum::from(Some("x")), Datum::Str("x".to_string()));
  }

  #[test]
  fn test_str_param_type_error() {
    let params = vec![Datum::from("a"), Datum::from(1)];
    assert_eq!(str_param(&params, 0).unwrap(), "a");

    match str_param(&params, 1) {
      Err(Error::ParamType {
        index, expected, ..
      }) => {
        assert_eq!(index, 1);
        assert_eq!(expected, "string");
      }
      other => panic!("expected ParamType, got {:?}", other),
    }
  }

  #[test]
  fn test_str_params() {
    let params = vec![Datum::from("a"), Datum::from("b")];
    assert_eq!(str_params(&params).unwrap(), vec!["a", "b"]);

    let params = vec![Datum::from("a"), Datum::from(true)];
    assert!(matches!(
      str_params(&params),
      Err(Error::ParamType { index: 1, .. })
    ));
  }

  #[test]
  fn test_expect_len() {
    let params = vec![Datum::from(1)];
    assert!(expect_len(&params, 1).is_ok());
    assert!(matches!(
      expect_len(&params, 2),
      Err(Error::ParamLength { got: 1, want: 2 })
    ));
    assert!(expect_at_least(&params, 1).is_ok());
    assert!(expect_at_least(&[], 1).is_err());
  }
}
