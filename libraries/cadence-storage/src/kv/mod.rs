//! Key-value preferences stores
//!
//! Values are arbitrary JSON. `JsonFileStore` persists the whole map on every
//! write; `MemoryStore` keeps it in memory only.

use crate::error::Result;
use crate::json_file;
use cadence_core::KeyValueStore;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key-value store backed by a single JSON object file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = json_file::read(&path)?.unwrap_or_default();
        tracing::debug!(path = %path.display(), "Opened preferences store");
        Ok(Self { path, values })
    }

    /// File backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn flush(&self) -> Result<()> {
        json_file::write(&self.path, &self.values)
    }
}

impl KeyValueStore for JsonFileStore {
    fn put(&mut self, key: &str, value: Value) -> cadence_core::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(self.flush()?)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> cadence_core::Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> cadence_core::Result<()> {
        self.values.clear();
        Ok(self.flush()?)
    }
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&mut self, key: &str, value: Value) -> cadence_core::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> cadence_core::Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> cadence_core::Result<()> {
        self.values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_put_get_clear() {
        let mut store = MemoryStore::new();
        store.put("a", json!(1)).unwrap();
        store.put("b", json!("two")).unwrap();

        assert_eq!(store.get("a"), Some(json!(1)));
        assert_eq!(store.keys(), vec!["a", "b"]);

        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
