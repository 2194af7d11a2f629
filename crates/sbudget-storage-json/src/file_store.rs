use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};

use sbudget_core::{CoreError, KeyValueStore, WriteBatch};
use serde_json::Value;
use tracing::debug;

use crate::fs_util::write_atomic;

/// Key-value store persisted as a single JSON object on disk.
///
/// The file is read once at open and mirrored in memory. Every batch is
/// written to a copy of the map, flushed through a temp file and rename, and
/// only then swapped in, so a failed write leaves both disk and memory as
/// they were.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// Fails with [`CoreError::StorageUnavailable`] when the directory cannot be
    /// created or the existing file is unreadable or not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| unavailable(&path, err))?;
        }
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| unavailable(&path, err))?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(unavailable(&path, err)),
        };
        debug!(path = %path.display(), keys = entries.len(), "json store opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::StorageUnavailable(format!("{}: {err}", path.display()))
}

fn poisoned() -> CoreError {
    CoreError::Storage("json store lock poisoned".into())
}

impl KeyValueStore for JsonFileStore {
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
        if batch.is_empty() {
            return Ok(());
        }
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        let mut next = map.clone();
        let ops = batch.len();
        batch.apply_to(&mut next);
        write_atomic(&self.path, &serde_json::to_string_pretty(&next)?)?;
        *map = next;
        debug!(ops, "json store batch committed");
        Ok(())
    }
}
