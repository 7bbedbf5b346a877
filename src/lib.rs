//! Kiwi: an embeddable in-memory key-value store with typed values
//!
//! Every key holds a value of a registered type. Values are manipulated by
//! invoking named actions on them, and the whole store can be exported to
//! and imported from JSON.
//!
//! ```
//! use kiwi::values::{list, string};
//! use kiwi::{Datum, Store};
//!
//! let store = Store::new();
//! store.add_key("greeting", string::TYPE).unwrap();
//! store
//!   .execute("greeting", string::UPDATE, &["hello".into()])
//!   .unwrap();
//! assert_eq!(
//!   store.execute("greeting", string::GET, &[]).unwrap(),
//!   Datum::from("hello")
//! );
//!
//! store.add_key("queue", list::TYPE).unwrap();
//! store
//!   .execute("queue", list::APPEND, &["a".into(), "b".into()])
//!   .unwrap();
//! assert_eq!(store.execute("queue", list::LEN, &[]).unwrap(), Datum::Int(2));
//! ```

pub mod config;
pub mod datum;
pub mod error;
pub mod registry;
pub mod schema;
mod slot;
pub mod store;
pub mod value;
pub mod values;

pub use datum::{Datum, ScoredItem};
pub use error::{Error, Result};
pub use registry::Registry;
pub use schema::Schema;
pub use store::{ImportOptions, Store, StoreJson, ValJson};
pub use value::{ActionFn, ActionTable, Value};
