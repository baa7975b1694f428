// Persistent store abstraction + in-memory implementation

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::model::StoredValue;

#[derive(Debug, Clone)]
pub enum StoreError {
    /// Backend unreachable (connection refused, locked file, ...).
    Unavailable(String),
    /// Backend-level failure (SQL error, corrupt row, ...).
    Backend(String),
    /// Value could not be serialized for storage.
    Serialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            Self::Backend(msg) => write!(f, "store backend error: {msg}"),
            Self::Serialize(msg) => write!(f, "value serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Key/value store with single-key atomicity.
///
/// Absence is the sentinel: a key that was never written returns
/// `Ok(None)`, which is distinct from every legal stored value including
/// `false`, `""`, `[]`, and `null`.
pub trait PersistentStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Record layout
// ---------------------------------------------------------------------------

// Each option is three independently addressable facts in the store, so a
// reset can clear metadata while leaving the value slot intact.

pub fn value_key(key: &str) -> String {
    format!("value:{key}")
}

pub fn panel_saved_key(key: &str) -> String {
    format!("meta:{key}:panel_saved")
}

pub fn code_hash_key(key: &str) -> String {
    format!("meta:{key}:code_hash")
}

/// Read the full record for one option. `None` means no writer has ever
/// touched the key.
pub fn read_record<S: PersistentStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<StoredValue>, StoreError> {
    let value = match store.get(&value_key(key))? {
        Some(v) => v,
        None => return Ok(None),
    };
    let panel_saved = matches!(store.get(&panel_saved_key(key))?, Some(Value::Bool(true)));
    let code_hash_at_save = match store.get(&code_hash_key(key))? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };
    Ok(Some(StoredValue {
        value,
        panel_saved,
        code_hash_at_save,
    }))
}

/// Persist a panel save: value plus both metadata facts.
pub(crate) fn write_panel_record<S: PersistentStore>(
    store: &mut S,
    key: &str,
    value: &Value,
    code_hash: &str,
) -> Result<(), StoreError> {
    store.set(&value_key(key), value)?;
    store.set(&panel_saved_key(key), &Value::Bool(true))?;
    store.set(&code_hash_key(key), &Value::String(code_hash.to_string()))
}

/// Drop both metadata facts, returning the key to code-owned status.
pub(crate) fn clear_meta<S: PersistentStore>(store: &mut S, key: &str) -> Result<(), StoreError> {
    store.delete(&panel_saved_key(key))?;
    store.delete(&code_hash_key(key))
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// HashMap-backed store for tests and embedders that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
