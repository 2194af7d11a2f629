//! Generic key-value persistence contract used by the record store.

use std::{collections::BTreeMap, sync::RwLock};

use serde_json::Value;

use crate::CoreError;

/// A single mutation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Put { key: String, value: Value },
    Remove { key: String },
}

/// Ordered set of mutations applied as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value,
        });
        self
    }

    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Remove { key: key.into() });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replays the batch onto an in-memory map, in insertion order.
    pub fn apply_to(self, map: &mut BTreeMap<String, Value>) {
        for op in self.ops {
            match op {
                WriteOp::Put { key, value } => {
                    map.insert(key, value);
                }
                WriteOp::Remove { key } => {
                    map.remove(&key);
                }
            }
        }
    }
}

/// Abstraction over persistence backends capable of storing JSON values by key.
///
/// `apply` must be atomic: readers observe either none or all of a batch.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, CoreError>;

    /// Lists keys starting with `prefix` in ascending order.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, CoreError>;

    fn apply(&self, batch: WriteBatch) -> Result<(), CoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut batch = WriteBatch::new();
        batch.put(key, value);
        self.apply(batch)
    }

    /// Removes `key`, returning whether it existed.
    fn remove(&self, key: &str) -> Result<bool, CoreError> {
        if self.get(key)?.is_none() {
            return Ok(false);
        }
        let mut batch = WriteBatch::new();
        batch.remove(key);
        self.apply(batch)?;
        Ok(true)
    }

    /// Returns every `(key, value)` pair under `prefix`.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Value)>, CoreError> {
        let mut entries = Vec::new();
        for key in self.list_keys(prefix)? {
            if let Some(value) = self.get(&key)? {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, CoreError> {
        (**self).get(key)
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, CoreError> {
        (**self).list_keys(prefix)
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), CoreError> {
        (**self).apply(batch)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), CoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, CoreError> {
        (**self).remove(key)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Value)>, CoreError> {
        (**self).scan(prefix)
    }
}

/// Volatile store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let map = self.entries.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, CoreError> {
        let map = self.entries.read().map_err(|_| poisoned())?;
        Ok(map
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), CoreError> {
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        batch.apply_to(&mut map);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_keys_respects_prefix_and_order() {
        let store = MemoryStore::new();
        store.set("b/2", json!(2)).unwrap();
        store.set("a/1", json!(1)).unwrap();
        store.set("b/1", json!(1)).unwrap();
        store.set("c", json!(3)).unwrap();
        assert_eq!(store.list_keys("b/").unwrap(), vec!["b/1", "b/2"]);
        assert_eq!(store.list_keys("").unwrap().len(), 4);
    }

    #[test]
    fn remove_reports_missing_keys() {
        let store = MemoryStore::new();
        store.set("k", json!("v")).unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn batch_applies_in_order() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.put("x", json!(1)).remove("x").put("y", json!(2));
        store.apply(batch).unwrap();
        assert_eq!(store.get("x").unwrap(), None);
        assert_eq!(store.get("y").unwrap(), Some(json!(2)));
    }
}
