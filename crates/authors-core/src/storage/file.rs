//! File-backed key-value persistence
//!
//! The whole key space lives in one JSON object file. Every write
//! re-serializes the map and replaces the file atomically (write to temp
//! file, then rename), so the file is never left partially written.
//!
//! Storage location: `~/.local/share/authors/storage.json` (configurable
//! via `Config`)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError, StorageResult};
use crate::config::Config;

/// [`KeyValueStore`] persisted to a single JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    recovered: Option<StorageError>,
}

impl FileStore {
    /// Open the storage file at `path`
    ///
    /// A missing file is an empty store. A file that exists but can't be
    /// parsed is moved to `<file>.corrupt.backup` and the store starts
    /// empty; the [`StorageError::Corrupt`] describing the move is kept in
    /// [`recovered`](Self::recovered).
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No storage file at {:?}, starting empty", path);
                return Ok(Self::empty(path, None));
            }
            Err(e) => return Err(StorageError::from_read(e, path)),
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(Self {
                path,
                entries,
                recovered: None,
            }),
            Err(e) => {
                let backup_path = backup_path_for(&path);
                fs::rename(&path, &backup_path)
                    .map_err(|io_err| StorageError::from_io(io_err, backup_path.clone()))?;
                warn!("Storage file {:?} is corrupt, moved to {:?}", path, backup_path);
                let corrupt = StorageError::Corrupt {
                    path: path.clone(),
                    backup_path,
                    details: e.to_string(),
                };
                Ok(Self::empty(path, Some(corrupt)))
            }
        }
    }

    fn empty(path: PathBuf, recovered: Option<StorageError>) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
            recovered,
        }
    }

    /// Open the storage file named by the configuration
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        Self::open(config.storage_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the backing file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Corruption that was moved aside when the file was opened
    pub fn recovered(&self) -> Option<&StorageError> {
        self.recovered.as_ref()
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());

        let bytes = serde_json::to_vec_pretty(&next)?;
        atomic_write(&self.path, &bytes)?;

        // Only adopt the new contents once they are on disk
        self.entries = next;
        debug!("Wrote key {} to {:?}", key, self.path);
        Ok(())
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt.backup");
    PathBuf::from(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
