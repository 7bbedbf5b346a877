//! Value type registry
//!
//! Maps type names to constructors so new value types can be plugged in
//! without touching the store. Built-in types register themselves through
//! `crate::values::register_builtins`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{Error, Result};
use crate::value::Value;

/// Zero-argument constructor for a value type
pub type Constructor = fn() -> Box<dyn Value>;

static SHARED: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::with_builtins()));

/// Table of known value types
#[derive(Clone, Default)]
pub struct Registry {
  constructors: HashMap<&'static str, Constructor>,
}

impl Registry {
  /// Create a registry without any value types
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a registry holding the built-in value types
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    crate::values::register_builtins(&mut registry);
    registry
  }

  /// Process-wide registry of the built-in types
  pub fn shared() -> Arc<Registry> {
    Arc::clone(&SHARED)
  }

  /// Register a value type
  ///
  /// The constructor is invoked once to learn the type name.
  ///
  /// # Panics
  ///
  /// Panics if the type name is already registered.
  pub fn register(&mut self, constructor: Constructor) {
    if let Err(e) = self.try_register(constructor) {
      panic!("{}", e);
    }
  }

  /// Same as `register` but returns an error on a duplicate name
  pub fn try_register(&mut self, constructor: Constructor) -> Result<()> {
    let type_name = constructor().type_name();
    if self.constructors.contains_key(type_name) {
      return Err(Error::TypeRegistered(type_name.to_string()));
    }

    debug!(type_name, "registered value type");
    self.constructors.insert(type_name, constructor);
    Ok(())
  }

  /// Build a fresh value of `type_name`
  pub fn construct(&self, type_name: &str) -> Result<Box<dyn Value>> {
    self
      .constructors
      .get(type_name)
      .map(|constructor| constructor())
      .ok_or_else(|| Error::TypeNotRegistered(type_name.to_string()))
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.constructors.contains_key(type_name)
  }

  /// Names of all registered types, in no particular order
  pub fn list(&self) -> Vec<String> {
    self.constructors.keys().map(|k| k.to_string()).collect()
  }

  pub fn len(&self) -> usize {
    self.constructors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.constructors.is_empty()
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names = self.list();
    names.sort();
    f.debug_struct("Registry").field("types", &names).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::values::{list, string};

  fn new_str() -> Box<dyn Value> {
    Box::new(string::Str::default())
  }

  #[test]
  fn test_construct_registered() {
    let mut registry = Registry::new();
    registry.register(new_str);

    let value = registry.construct("str").unwrap();
    assert_eq!(value.type_name(), "str");
    assert!(registry.contains("str"));
    assert_eq!(registry.list(), vec!["str".to_string()]);
  }

  #[test]
  fn test_construct_unregistered() {
    let registry = Registry::new();
    assert!(matches!(
      registry.construct("str"),
      Err(Error::TypeNotRegistered(name)) if name == "str"
    ));
  }

  #[test]
  #[should_panic(expected = "value already registered: str")]
  fn test_duplicate_registration_panics() {
    let mut registry = Registry::new();
    registry.register(new_str);
    registry.register(new_str);
  }

  #[test]
  fn test_try_register_duplicate() {
    let mut registry = Registry::new();
    registry.try_register(new_str).unwrap();
    assert!(matches!(
      registry.try_register(new_str),
      Err(Error::TypeRegistered(_))
    ));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn test_builtins() {
    let registry = Registry::with_builtins();
    let mut names = registry.list();
    names.sort();
    assert_eq!(names, vec!["hash", "list", "set", "str", "zhash", "zset"]);
    assert_eq!(registry.construct(list::TYPE).unwrap().type_name(), "list");
  }

  #[test]
  fn test_shared_is_shared() {
    let a = Registry::shared();
    let b = Registry::shared();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 6);
  }
}
