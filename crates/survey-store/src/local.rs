//! Local persistent storage
//!
//! A string-keyed, string-valued mapping that survives restarts, plus the
//! response cache kept under [`SURVEY_DATA_KEY`].
//!
//! Corrupt content is never an error on read: a damaged storage file or an
//! undecodable response list reads as empty.

use crate::error::StoreError;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use survey_core::ResponseRecord;

/// Key of the cached response list
pub const SURVEY_DATA_KEY: &str = "surveyData";

/// File name used by [`FileStorage::in_dir`]
pub const STORAGE_FILE_NAME: &str = "local_storage.json";

/// Persistent string mapping
pub trait LocalStorage: Debug + Send + Sync {
    /// Read a value
    ///
    /// # Errors
    /// - `StoreError::Io` if the backing medium cannot be read
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value
    ///
    /// # Errors
    /// - `StoreError::Io` if the backing medium cannot be written
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value; removing a missing key is not an error
    ///
    /// # Errors
    /// - `StoreError::Io` if the backing medium cannot be written
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.write().remove(key);
        Ok(())
    }
}

/// Storage backed by one JSON object file
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Use `path` as the storage file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Use [`STORAGE_FILE_NAME`] inside `dir`
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE_NAME))
    }

    /// Storage file location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        Ok(serde_json::from_str(&text).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "storage file is corrupt; treating as empty");
            BTreeMap::new()
        }))
    }

    fn store(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }

        let text = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text).map_err(|err| StoreError::io(&tmp, err))?;
        std::fs::rename(&tmp, &self.path).map_err(|err| StoreError::io(&self.path, err))
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut items = self.load()?;
        f(&mut items);
        self.store(&items)
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.update(|items| {
            items.remove(key);
        })
    }
}

/// Local copy of the response list
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    storage: Arc<dyn LocalStorage>,
}

impl LocalCacheStore {
    /// Wrap a storage backend
    #[inline]
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Append one record to the stored list
    ///
    /// A missing or corrupt list is replaced by `[record]`.
    ///
    /// # Errors
    /// - `StoreError` if the updated list cannot be written
    pub fn append(&self, record: &ResponseRecord) -> Result<(), StoreError> {
        let mut items = self.read_values();
        items.push(serde_json::to_value(record)?);
        let text = serde_json::to_string(&items)?;
        self.storage.set_item(SURVEY_DATA_KEY, &text)
    }

    /// All stored records, oldest first
    #[must_use]
    pub fn read_all(&self) -> Vec<ResponseRecord> {
        decode_records(self.read_values())
    }

    /// Drop the stored list
    ///
    /// # Errors
    /// - `StoreError` if the storage cannot be written
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(SURVEY_DATA_KEY)
    }

    fn read_values(&self) -> Vec<Value> {
        let raw = match self.storage.get_item(SURVEY_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "local storage unreadable; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!("local response list is not an array; treating as empty");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "local response list is corrupt; treating as empty");
                Vec::new()
            }
        }
    }
}

/// Decode stored records, skipping entries that are not records
pub(crate) fn decode_records(items: Vec<Value>) -> Vec<ResponseRecord> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping undecodable response record");
                None
            }
        })
        .collect()
}
