//! The contract every storable value type implements
//!
//! A value type exposes a stable type name, a table of named actions and a
//! JSON snapshot of its state. The store never looks inside a value; it
//! dispatches actions through the table and moves snapshots around as raw
//! JSON.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::value::RawValue;

use crate::datum::Datum;
use crate::error::{Error, Result};

/// Type-erased action function
pub type ActionFn = Arc<dyn Fn(&mut dyn Value, &[Datum]) -> Result<Datum> + Send + Sync>;

/// Upcast to `Any`, implemented for every sized `'static` type
pub trait AsAny {
  fn as_any(&self) -> &dyn Any;
  fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}

/// Something that can be associated with a key
pub trait Value: AsAny + Send + Sync + 'static {
  /// Name of the type, unique within a registry
  fn type_name(&self) -> &'static str;

  /// Every action the type supports
  fn action_table(&self) -> ActionTable;

  /// Snapshot of the current state
  fn to_json(&self) -> Result<Box<RawValue>>;

  /// Replaces the current state with a snapshot
  fn from_json(&mut self, data: &RawValue) -> Result<()>;
}

/// Mapping from action name to action function
#[derive(Clone, Default)]
pub struct ActionTable {
  actions: HashMap<&'static str, ActionFn>,
}

impl ActionTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Binds `name` to a method of the concrete value type `V`
  pub fn with<V: Value>(mut self, name: &'static str, f: fn(&mut V, &[Datum]) -> Result<Datum>) -> Self {
    let action: ActionFn = Arc::new(move |value: &mut dyn Value, params: &[Datum]| {
      let typed = value
        .as_any_mut()
        .downcast_mut::<V>()
        .ok_or(Error::ActionTarget {
          expected: std::any::type_name::<V>(),
        })?;
      f(typed, params)
    });
    self.actions.insert(name, action);
    self
  }

  /// Binds `name` to an already type-erased function
  pub fn insert(&mut self, name: &'static str, action: ActionFn) {
    self.actions.insert(name, action);
  }

  pub fn get(&self, name: &str) -> Option<&ActionFn> {
    self.actions.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.actions.contains_key(name)
  }

  /// Action names, sorted
  pub fn names(&self) -> Vec<&'static str> {
    let mut names: Vec<_> = self.actions.keys().copied().collect();
    names.sort_unstable();
    names
  }

  pub fn len(&self) -> usize {
    self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }
}

impl fmt::Debug for ActionTable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}

/// Serializes `data` into a raw JSON snapshot for a value of `type_name`
pub fn to_raw<T: serde::Serialize + ?Sized>(type_name: &str, data: &T) -> Result<Box<RawValue>> {
  serde_json::value::to_raw_value(data).map_err(|source| Error::Serialization {
    type_name: type_name.to_string(),
    source,
  })
}

/// Parses a raw JSON snapshot for a value of `type_name`
pub fn from_raw<T: serde::de::DeserializeOwned>(type_name: &str, data: &RawValue) -> Result<T> {
  serde_json::from_str(data.get()).map_err(|source| Error::Deserialization {
    type_name: type_name.to_string(),
    source,
  })
}
