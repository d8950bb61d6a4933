use crate::config::AppConfig;
use ppl_core::storage::{KeyValueStore, MemoryStore, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};

/// One file per key inside the data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    quota: usize,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>, quota: usize) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if value.len() > self.quota {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                quota: self.quota,
            });
        }
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Opens the configured data directory, or an in-memory store when that is
/// not possible. Study state then lasts only for this run.
pub fn open_or_memory(config: &AppConfig) -> Rc<dyn KeyValueStore> {
    let Some(dir) = config.data_dir.as_ref() else {
        warn!("no data directory available; progress will not be saved");
        return Rc::new(MemoryStore::with_quota(config.quota_bytes));
    };

    match FileStore::open(dir, config.quota_bytes) {
        Ok(store) => {
            info!(dir = %store.dir().display(), "using data directory");
            Rc::new(store)
        }
        Err(e) => {
            warn!(error = %e, dir = %dir.display(), "could not open data directory; progress will not be saved");
            Rc::new(MemoryStore::with_quota(config.quota_bytes))
        }
    }
}
