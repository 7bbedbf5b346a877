//! Built-in value types
//!
//! This module provides the standard value types a store can hold: a string,
//! an ordered list, an unordered set, a string hash map and two
//! score-ordered collections.

pub mod hash;
pub mod list;
pub mod set;
pub mod sorted;
pub mod string;
pub mod zhash;
pub mod zset;

pub use hash::Hash;
pub use list::List;
pub use set::Set;
pub use sorted::SortedSet;
pub use string::Str;
pub use zhash::ZHash;
pub use zset::ZSet;

use crate::registry::Registry;

/// Register every built-in value type with `registry`
pub fn register_builtins(registry: &mut Registry) {
  string::register(registry);
  list::register(registry);
  set::register(registry);
  hash::register(registry);
  zset::register(registry);
  zhash::register(registry);
}
