//! `str` value type

use serde_json::value::RawValue;

use crate::datum::{Datum, expect_at_least, str_param};
use crate::error::Result;
use crate::registry::Registry;
use crate::value::{ActionTable, Value, from_raw, to_raw};

/// Type name of the string value
pub const TYPE: &str = "str";

/// Gets the string. Returns a string.
pub const GET: &str = "GET";
/// Replaces the string with the single string parameter. Returns the new string.
pub const UPDATE: &str = "UPDATE";

pub fn register(registry: &mut Registry) {
  registry.register(construct);
}

fn construct() -> Box<dyn Value> {
  Box::new(Str::default())
}

/// A single string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Str(String);

impl Str {
  pub fn new(data: impl Into<String>) -> Self {
    Self(data.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  fn get(&mut self, _params: &[Datum]) -> Result<Datum> {
    Ok(Datum::Str(self.0.clone()))
  }

  fn update(&mut self, params: &[Datum]) -> Result<Datum> {
    expect_at_least(params, 1)?;
    self.0 = str_param(params, 0)?.to_string();
    Ok(Datum::Str(self.0.clone()))
  }
}

impl Value for Str {
  fn type_name(&self) -> &'static str {
    TYPE
  }

  fn action_table(&self) -> ActionTable {
    ActionTable::new()
      .with(GET, Str::get)
      .with(UPDATE, Str::update)
  }

  fn to_json(&self) -> Result<Box<RawValue>> {
    to_raw(TYPE, &self.0)
  }

  fn from_json(&mut self, data: &RawValue) -> Result<()> {
    self.0 = from_raw(TYPE, data)?;
    Ok(())
  }
}
