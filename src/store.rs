use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, trace, warn};

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::schema::Schema;
use crate::slot::KeySlot;

/// Exported form of a single key
#[derive(Debug, Serialize, Deserialize)]
pub struct ValJson {
  #[serde(rename = "type")]
  pub type_name: String,
  pub data: Box<RawValue>,
}

/// Exported form of a whole store, ordered by key
pub type StoreJson = BTreeMap<String, ValJson>;

/// Controls how `Store::import` reconciles a document with existing keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
  /// Add keys that are missing from the store
  pub add_keys: bool,
  /// Replace keys whose stored type differs from the imported type
  pub update_types: bool,
  /// Fail on keys missing from the store, only considered when
  /// `add_keys` is false
  pub err_on_invalid_key: bool,
}

impl ImportOptions {
  pub fn add_keys(mut self, yes: bool) -> Self {
    self.add_keys = yes;
    self
  }

  pub fn update_types(mut self, yes: bool) -> Self {
    self.update_types = yes;
    self
  }

  pub fn err_on_invalid_key(mut self, yes: bool) -> Self {
    self.err_on_invalid_key = yes;
    self
  }
}

/// In-memory typed key-value store
///
/// The store-wide lock guards which keys exist. Each key's data is guarded by
/// the lock of its own slot, so operations on different keys never wait on
/// each other beyond the brief map lookup.
pub struct Store {
  kv: RwLock<HashMap<String, Arc<KeySlot>>>,
  registry: Arc<Registry>,
}

impl Store {
  /// Create a new empty store backed by the built-in value types
  pub fn new() -> Self {
    Self::with_registry(Registry::shared())
  }

  /// Create a new empty store backed by `registry`
  pub fn with_registry(registry: Arc<Registry>) -> Self {
    Self {
      kv: RwLock::new(HashMap::new()),
      registry,
    }
  }

  /// Create a store with every key of `schema` added
  pub fn from_schema(schema: &Schema) -> Result<Self> {
    Self::from_schema_with_registry(schema, Registry::shared())
  }

  pub fn from_schema_with_registry(schema: &Schema, registry: Arc<Registry>) -> Result<Self> {
    let store = Self::with_registry(registry);
    for (key, type_name) in schema.iter() {
      store.add_key(key, type_name)?;
    }
    Ok(store)
  }

  pub fn registry(&self) -> &Arc<Registry> {
    &self.registry
  }

  pub fn key_exists(&self, key: &str) -> bool {
    self.kv.read().contains_key(key)
  }

  /// Present keys, in no particular order
  pub fn keys(&self) -> Vec<String> {
    self.kv.read().keys().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.kv.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.kv.read().is_empty()
  }

  /// Add a new key holding a fresh value of `type_name`
  pub fn add_key(&self, key: &str, type_name: &str) -> Result<()> {
    if self.key_exists(key) {
      return Err(Error::KeyExists(key.to_string()));
    }

    let slot = Arc::new(KeySlot::new(self.registry.construct(type_name)?));

    let mut kv = self.kv.write();
    if kv.contains_key(key) {
      return Err(Error::KeyExists(key.to_string()));
    }
    kv.insert(key.to_string(), slot);

    debug!(key, type_name, "added key");
    Ok(())
  }

  /// Replace the value of an existing key with a fresh value of `type_name`
  ///
  /// The old data is discarded.
  pub fn update_key(&self, key: &str, type_name: &str) -> Result<()> {
    if !self.key_exists(key) {
      return Err(Error::KeyNotExist(key.to_string()));
    }

    let slot = Arc::new(KeySlot::new(self.registry.construct(type_name)?));

    let mut kv = self.kv.write();
    let old = kv
      .get(key)
      .cloned()
      .ok_or_else(|| Error::KeyNotExist(key.to_string()))?;

    // wait for in-flight operations on the old value
    let drained = old.write();
    kv.insert(key.to_string(), slot);
    drop(drained);

    debug!(key, from = old.type_name(), to = type_name, "updated key");
    Ok(())
  }

  /// Remove an existing key
  pub fn delete_key(&self, key: &str) -> Result<()> {
    let mut kv = self.kv.write();
    let old = kv
      .get(key)
      .cloned()
      .ok_or_else(|| Error::KeyNotExist(key.to_string()))?;

    let drained = old.write();
    kv.remove(key);
    drop(drained);

    debug!(key, "deleted key");
    Ok(())
  }

  /// Type name of the value held by `key`
  pub fn value_type(&self, key: &str) -> Result<&'static str> {
    let slot = self.slot(key)?;
    let value = slot.read();
    Ok(value.type_name())
  }

  /// Snapshot of every present key and its type
  pub fn schema(&self) -> Schema {
    self
      .kv
      .read()
      .iter()
      .map(|(key, slot)| (key.clone(), slot.type_name()))
      .collect()
  }

  /// Names of the actions supported by the value held by `key`
  pub fn actions(&self, key: &str) -> Result<Vec<&'static str>> {
    Ok(self.slot(key)?.actions().names())
  }

  /// Invoke `action` on the value held by `key`
  ///
  /// Errors raised by the action itself are returned unchanged.
  pub fn execute(&self, key: &str, action: &str, params: &[Datum]) -> Result<Datum> {
    let slot = self.slot(key)?;
    let action_fn = slot.action(action).ok_or_else(|| Error::InvalidAction {
      key: key.to_string(),
      action: action.to_string(),
    })?;

    trace!(key, action, params = params.len(), "executing action");
    let mut value = slot.write();
    action_fn(&mut **value, params)
  }

  /// Serialized snapshot of the value held by `key`
  pub fn to_json(&self, key: &str) -> Result<Box<RawValue>> {
    let slot = self.slot(key)?;
    let value = slot.read();
    value.to_json()
  }

  /// Replace the value held by `key` with a serialized snapshot
  pub fn from_json(&self, key: &str, data: &RawValue) -> Result<()> {
    let slot = self.slot(key)?;
    let mut value = slot.write();
    value.from_json(data)
  }

  /// Same as `from_json` for a snapshot held in a string
  pub fn from_json_str(&self, key: &str, data: &str) -> Result<()> {
    let slot = self.slot(key)?;
    let raw: Box<RawValue> =
      serde_json::from_str(data).map_err(|source| Error::Deserialization {
        type_name: slot.type_name().to_string(),
        source,
      })?;
    let mut value = slot.write();
    value.from_json(&raw)
  }

  /// Every key with its type and serialized data
  ///
  /// No key is added or removed while the snapshot is taken. Each value is
  /// locked only while it is being serialized.
  pub fn snapshot(&self) -> Result<StoreJson> {
    let kv = self.kv.read();
    let mut out = StoreJson::new();

    for (key, slot) in kv.iter() {
      let data = slot.read().to_json().inspect_err(|e| {
        warn!(key = key.as_str(), error = %e, "failed to export key");
      })?;
      out.insert(
        key.clone(),
        ValJson {
          type_name: slot.type_name().to_string(),
          data,
        },
      );
    }

    Ok(out)
  }

  /// JSON document of the whole store
  ///
  /// The format is `{"key": {"type": "str", "data": "hello"}, ...}` where
  /// the shape of `data` is up to each value type.
  pub fn export(&self) -> Result<Vec<u8>> {
    let snapshot = self.snapshot()?;
    serde_json::to_vec(&snapshot).map_err(|source| Error::Serialization {
      type_name: "store".to_string(),
      source,
    })
  }

  /// Load a JSON document produced by `export`
  ///
  /// Unknown keys are skipped unless `opts` says otherwise. The first failing
  /// key aborts the import; keys applied before it stay applied.
  pub fn import(&self, data: &[u8], opts: ImportOptions) -> Result<()> {
    let doc: StoreJson = serde_json::from_slice(data).map_err(Error::MalformedImport)?;
    self.import_json(doc, opts)
  }

  /// Same as `import` for an already parsed document
  pub fn import_json(&self, doc: StoreJson, opts: ImportOptions) -> Result<()> {
    let mut kv = self.kv.write();

    for (key, entry) in doc {
      if let Err(e) = self.import_entry(&mut kv, &key, entry, opts) {
        warn!(key = key.as_str(), error = %e, "import aborted");
        return Err(e);
      }
    }

    Ok(())
  }

  fn import_entry(
    &self,
    kv: &mut HashMap<String, Arc<KeySlot>>,
    key: &str,
    entry: ValJson,
    opts: ImportOptions,
  ) -> Result<()> {
    let slot = match kv.get(key).cloned() {
      Some(slot) => slot,
      None if opts.add_keys => {
        let slot = Arc::new(KeySlot::new(self.registry.construct(&entry.type_name)?));
        kv.insert(key.to_string(), Arc::clone(&slot));
        debug!(key, type_name = entry.type_name.as_str(), "import added key");
        slot
      }
      None if opts.err_on_invalid_key => return Err(Error::KeyNotExist(key.to_string())),
      None => {
        debug!(key, "import skipped unknown key");
        return Ok(());
      }
    };

    let slot = if slot.type_name() != entry.type_name {
      if !opts.update_types {
        return Err(Error::TypeMismatch {
          key: key.to_string(),
          stored: slot.type_name().to_string(),
          imported: entry.type_name,
        });
      }

      let fresh = Arc::new(KeySlot::new(self.registry.construct(&entry.type_name)?));
      let drained = slot.write();
      kv.insert(key.to_string(), Arc::clone(&fresh));
      drop(drained);
      debug!(key, from = slot.type_name(), to = fresh.type_name(), "import retyped key");
      fresh
    } else {
      slot
    };

    let mut value = slot.write();
    value.from_json(&entry.data)
  }

  /// Resolve `key` to its slot, holding the store-wide lock only for the lookup
  fn slot(&self, key: &str) -> Result<Arc<KeySlot>> {
    self
      .kv
      .read()
      .get(key)
      .cloned()
      .ok_or_else(|| Error::KeyNotExist(key.to_string()))
  }
}

impl Default for Store {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Store {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Store")
      .field("schema", &self.schema())
      .field("registry", &self.registry)
      .finish()
  }
}
