//! Per-key storage unit

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::value::{ActionFn, ActionTable, Value};

/// A key's value together with a lock exclusive to that key
///
/// The action table is built once when the slot is created so dispatch never
/// rebuilds it. A slot is never retyped in place; changing a key's type
/// replaces the whole slot.
pub(crate) struct KeySlot {
  value: RwLock<Box<dyn Value>>,
  type_name: &'static str,
  actions: ActionTable,
}

impl KeySlot {
  pub(crate) fn new(value: Box<dyn Value>) -> Self {
    let type_name = value.type_name();
    let actions = value.action_table();
    Self {
      value: RwLock::new(value),
      type_name,
      actions,
    }
  }

  /// Type name of the held value, fixed for the slot's lifetime
  pub(crate) fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub(crate) fn action(&self, name: &str) -> Option<&ActionFn> {
    self.actions.get(name)
  }

  pub(crate) fn actions(&self) -> &ActionTable {
    &self.actions
  }

  pub(crate) fn read(&self) -> RwLockReadGuard<'_, Box<dyn Value>> {
    self.value.read()
  }

  pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Box<dyn Value>> {
    self.value.write()
  }
}
