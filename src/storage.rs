//! Durable key-value storage for the board.
//!
//! The board writes one record under a fixed key after every committed
//! mutation and reads it back on the next start. [`FileStorage`] keeps each
//! key in `<dir>/<key>.json`; [`MemoryStorage`] keeps them in memory and is
//! shared between clones, which lets a test "reload" a board.

use crate::error::StorageError;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

pub const DEFAULT_STORAGE_KEY: &str = "task-storage";

/// Version written into the persisted envelope.
pub const STATE_VERSION: u32 = 0;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The persisted part of the board: tasks and search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBoard {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub search_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub state: PersistedBoard,
    #[serde(default)]
    pub version: u32,
}

impl PersistedState {
    pub fn new(tasks: Vec<Task>, search_query: String) -> Self {
        Self {
            state: PersistedBoard {
                tasks,
                search_query,
            },
            version: STATE_VERSION,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.trim().is_empty() {
            return Err(StorageError::EmptyKey);
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let write_err = |source: io::Error| StorageError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        // The record is replaced whole or not at all.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.trim().is_empty() {
            return Err(StorageError::EmptyKey);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_tasks() -> Vec<Task> {
        serde_json::from_value(serde_json::json!([
            {
                "id": "1", "title": "Fix bug", "status": "todo", "category": "web",
                "categoryColor": "bg-blue-500", "dueDate": "Mar 3",
                "avatars": ["AB", "CD"], "metrics": {"comments": 2},
                "hasImage": true
            },
            {"id": "2", "title": "Legacy", "status": "archived", "category": "ops"}
        ]))
        .unwrap()
    }

    #[test]
    fn file_storage_round_trips_state() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        let state = PersistedState::new(sample_tasks(), "Bug".into());

        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap(), None);
        storage
            .set(DEFAULT_STORAGE_KEY, &state.to_json().unwrap())
            .unwrap();

        let raw = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let reloaded = PersistedState::from_json(&raw).unwrap();
        assert_eq!(reloaded, state);
        assert!(dir.path().join("nested/task-storage.json").exists());
        assert!(!dir.path().join("nested/task-storage.json.tmp").exists());
    }

    #[test]
    fn persisted_envelope_layout() {
        let state = PersistedState::new(sample_tasks(), "q".into());
        let json: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();

        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["searchQuery"], "q");
        assert_eq!(json["state"]["tasks"][1]["status"], "archived");
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(storage.set(" ", "x"), Err(StorageError::EmptyKey)));

        let files = FileStorage::new("unused");
        assert!(matches!(files.get(""), Err(StorageError::EmptyKey)));
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let mut a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v").unwrap();

        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(b.len(), 1);
    }
}
