use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors emitted while reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable string-to-string mapping that outlives the process.
pub trait KeyValueStore: Send {
    /// Return the stored value for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`. The write is durable once this returns.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Status describing how the settings file was loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLoadStatus {
    Loaded,
    Missing,
    Invalid(String),
}

/// Result of opening a [`FileStore`].
#[derive(Debug)]
pub struct StoreLoad {
    store: FileStore,
    status: StoreLoadStatus,
}

impl StoreLoad {
    /// Consume the value and return both store and status.
    pub fn into_parts(self) -> (FileStore, StoreLoadStatus) {
        (self.store, self.status)
    }
}

/// Key/value store persisted as a flat JSON object in a single file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store; unreadable JSON also yields an
    /// empty store with an [`StoreLoadStatus::Invalid`] status so callers
    /// can warn instead of failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<StoreLoad, StoreError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreLoad {
                    store: FileStore::empty(path),
                    status: StoreLoadStatus::Missing,
                });
            },
            Err(err) => return Err(err.into()),
        };

        let parsed = match serde_json::from_str::<serde_json::Value>(&data) {
            Ok(value) => value,
            Err(err) => {
                return Ok(StoreLoad {
                    store: FileStore::empty(path),
                    status: StoreLoadStatus::Invalid(format!("{err}")),
                });
            },
        };

        let Some(object) = parsed.as_object() else {
            return Ok(StoreLoad {
                store: FileStore::empty(path),
                status: StoreLoadStatus::Invalid(String::from(
                    "expected a JSON object at the top level",
                )),
            });
        };

        let mut entries = BTreeMap::new();
        for (key, value) in object {
            match value.as_str() {
                Some(text) => {
                    entries.insert(key.clone(), text.to_string());
                },
                None => log::warn!("ignoring non-string setting `{key}`"),
            }
        }

        Ok(StoreLoad {
            store: FileStore { path, entries },
            status: StoreLoadStatus::Loaded,
        })
    }

    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        save_entries_to_path(&self.path, &next)?;
        self.entries = next;
        Ok(())
    }
}

/// In-memory store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored pair.
    pub fn entries(&self) -> HashMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries =
            self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries =
            self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn save_entries_to_path(
    path: &Path,
    entries: &BTreeMap<String, String>,
) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let payload = serde_json::to_string_pretty(entries)?;
    write_atomic(path, payload.as_bytes())?;

    Ok(())
}

fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), std::io::Error> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
