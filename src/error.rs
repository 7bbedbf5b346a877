//! Error type shared by the store, the registry and the value types

use thiserror::Error;

/// Errors returned by store operations and value actions
#[derive(Debug, Error)]
pub enum Error {
  /// The key is already present in the store
  #[error("key already exists: {0}")]
  KeyExists(String),

  /// The key is not present in the store
  #[error("key does not exist: {0}")]
  KeyNotExist(String),

  /// No constructor is registered under this type name
  #[error("value not registered: {0}")]
  TypeNotRegistered(String),

  /// A constructor is already registered under this type name
  #[error("value already registered: {0}")]
  TypeRegistered(String),

  /// The value stored at `key` has no action named `action`
  #[error("invalid action: {action} on key {key}")]
  InvalidAction { key: String, action: String },

  /// An action was called with the wrong number of parameters
  #[error("invalid number of parameters: got {got}; requires {want}")]
  ParamLength { got: usize, want: usize },

  /// An action parameter has the wrong shape
  #[error("invalid parameter type at {index}: {got} not a(n) {expected}")]
  ParamType {
    index: usize,
    expected: &'static str,
    got: String,
  },

  /// An action parameter is well typed but cannot be processed
  #[error("invalid parameter value: {0}")]
  ParamValue(String),

  /// An index is outside the bounds of a list
  #[error("cannot access invalid index: {index} in list of length={len}")]
  InvalidIndex { index: i64, len: usize },

  /// A `[start, end)` range is outside the bounds of a list
  #[error("cannot access invalid index: ({start}, {end}) in list of length={len}")]
  InvalidRange { start: i64, end: i64, len: usize },

  /// A serialized payload could not be loaded into a value
  #[error("error in from_json for {type_name}: {source}")]
  Deserialization {
    type_name: String,
    #[source]
    source: serde_json::Error,
  },

  /// A value could not be serialized
  #[error("error in to_json for {type_name}: {source}")]
  Serialization {
    type_name: String,
    #[source]
    source: serde_json::Error,
  },

  /// Import found a key whose stored type differs from the imported one
  #[error("value type in JSON and store schema do not match for {key}: stored {stored}, got {imported}")]
  TypeMismatch {
    key: String,
    stored: String,
    imported: String,
  },

  /// The import document is not a valid `{key: {type, data}}` object
  #[error("malformed import document: {0}")]
  MalformedImport(#[source] serde_json::Error),

  /// An action table entry was bound to a different value type
  #[error("action bound to a value that is not a(n) {expected}")]
  ActionTarget { expected: &'static str },

  /// Error raised by a value type defined outside this crate
  #[error(transparent)]
  Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Shorthand for the parameter count error
  pub fn param_length(got: usize, want: usize) -> Self {
    Error::ParamLength { got, want }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
