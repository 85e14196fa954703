//! A [`KeyValueStore`] persisted as one JSON object on disk.
//!
//! The whole map is kept in memory and rewritten after every mutation. Writes
//! go to a temp file in the same directory, are fsynced, then renamed over the
//! target, so a crash leaves either the old file or the new one.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::backend::{KeyValueStore, StoreError};

/// Mode for the store file. Values are only obfuscated, so keep them private.
const STORE_FILE_MODE: u32 = 0o600;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating the parent directory if needed.
    ///
    /// A missing file is an empty store; it is created on the first write.
    /// A file that is not a JSON object of strings is reported as corrupt.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!(path = %parent.display(), "Created store directory");
            }
        }

        let entries: BTreeMap<String, String> = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "Opened file store");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Rewrite the store file from the in-memory map.
    ///
    /// The JSON is staged in a sibling temp file, restricted to
    /// [`STORE_FILE_MODE`] and fsynced before it replaces the store file.
    fn persist(&self) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => return Err(StoreError::NoParentDir(self.path.clone())),
        };
        if !dir.is_dir() {
            return Err(StoreError::NoParentDir(dir.to_path_buf()));
        }

        let mut staged = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut staged, &self.entries)?;
        staged.flush()?;
        restrict_permissions(staged.path())?;
        staged.as_file().sync_all()?;

        staged.persist(&self.path)?;
        // The rename is only durable once the directory entry is on disk.
        if let Ok(handle) = File::open(dir) {
            let _ = handle.sync_all();
        }

        debug!(path = %self.path.display(), entries = self.entries.len(), "Persisted file store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            // Keep memory in step with disk.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        if let Some(old) = self.entries.remove(key) {
            if let Err(e) = self.persist() {
                self.entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(STORE_FILE_MODE))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("prefs").join("store.json")
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(&store_path(&dir)).unwrap();
        assert_eq!(store.keys().count(), 0);
        assert!(dir.path().join("prefs").is_dir());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = FileStore::open(&path).unwrap();
        store.set_item("theme", "dark").unwrap();
        store.set_item("lang", "en").unwrap();
        store.remove_item("lang").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get_item("lang").unwrap(), None);
    }

    #[test]
    fn test_clear_persists() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let mut store = FileStore::open(&path).unwrap();
        store.set_item("a", "1").unwrap();
        store.clear().unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.keys().count(), 0);
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_store_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set_item("k", "v").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "Store file should have mode 0600");
    }

    #[test]
    fn test_failed_write_leaves_map_unchanged() {
        let mut store = FileStore {
            path: PathBuf::from("/nonexistent/dir/store.json"),
            entries: BTreeMap::from([("kept".to_string(), "1".to_string())]),
        };

        let err = store.set_item("new", "2").unwrap_err();
        assert!(matches!(err, StoreError::NoParentDir(_)));
        assert_eq!(store.get_item("new").unwrap(), None);

        assert!(store.clear().is_err());
        assert_eq!(store.get_item("kept").unwrap().as_deref(), Some("1"));
    }
}
