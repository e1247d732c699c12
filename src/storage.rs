//! The key/value medium settings are persisted to. It behaves like a browser's local storage:
//! string keys, string values, reads served from memory, writes made durable before they
//! return.

use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::Mutex;
use slog_scope::debug;

use crate::util::IoErrorKindExt as _;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to decode storage file {path:?}: {source}")]
    Decoding {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },
    #[error("Failed to encode storage file: {0}")]
    Encoding(#[source] simd_json::Error),
}

pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Sets several items at once. Either all of them are persisted or none are.
    fn set_items(&self, items: &[(&str, String)]) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    fn keys(&self) -> Vec<String>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn set_items(&self, items: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).set_items(items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Storage backed by a single JSON object file.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<IndexMap<String, String>>,
}

impl FileStorage {
    /// Opens the storage file at `path`. A missing file is an empty storage; it is created on
    /// the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(mut bytes) => simd_json::from_slice::<IndexMap<String, String>>(&mut bytes)
                .map_err(|source| StorageError::Decoding {
                    path: path.clone(),
                    source,
                })?,
            Err(e) if e.is_not_found() => IndexMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened storage {path:?} with {} entries", entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Opens the storage of a named profile in the application's storage directory.
    pub fn for_profile(profile: &str) -> Result<Self, StorageError> {
        Self::open(newtab_paths::storage_dir().join(format!("{profile}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` to a copy of the entries and makes the copy current only once it has been
    /// written to disk.
    fn update(&self, f: impl FnOnce(&mut IndexMap<String, String>)) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut updated = entries.clone();
        f(&mut updated);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn persist(&self, entries: &IndexMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            simd_json::to_writer(&mut writer, entries).map_err(StorageError::Encoding)?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn set_items(&self, items: &[(&str, String)]) -> Result<(), StorageError> {
        self.update(|entries| {
            for (key, value) in items {
                entries.insert((*key).to_owned(), value.clone());
            }
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if !self.entries.lock().contains_key(key) {
            return Ok(());
        }
        self.update(|entries| {
            entries.shift_remove(key);
        })
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

/// Storage that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<IndexMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStorage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: Mutex::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn set_items(&self, items: &[(&str, String)]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        for (key, value) in items {
            entries.insert((*key).to_owned(), value.clone());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}
