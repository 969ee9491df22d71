//! File-backed key-value store.
//!
//! Each key maps to `<data_dir>/<key>.json`. Writes land in a sibling
//! `.tmp` file first and are renamed into place, so a crash mid-write leaves
//! the previous record intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Store that keeps one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding the record files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        if let Err(e) = write_then_rename(&tmp, &path, value) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(key, error = %cleanup, "Temp file not removed");
            }
            return Err(e.into());
        }
        tracing::debug!(key, bytes = value.len(), "Record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_then_rename(tmp: &Path, path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("myshop-file-store-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();
        assert!(store.dir().is_dir());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_set_get_remove() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();

        assert_eq!(store.get("sellersProducts").unwrap(), None);
        store.set("sellersProducts", "[]").unwrap();
        assert_eq!(store.get("sellersProducts").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("sellersProducts.json").is_file());
        assert!(!dir.join("sellersProducts.json.tmp").exists());

        store.set("sellersProducts", "[1]").unwrap();
        assert_eq!(store.get("sellersProducts").unwrap().as_deref(), Some("[1]"));

        store.remove("sellersProducts").unwrap();
        store.remove("sellersProducts").unwrap();
        assert_eq!(store.get("sellersProducts").unwrap(), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();

        for key in ["", "../escape", "a/b", "dot.ted"] {
            assert!(
                matches!(store.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();
        // A directory in the record's place makes the final rename fail.
        fs::create_dir(dir.join("cart.json")).unwrap();

        assert!(matches!(store.set("cart", "[]"), Err(StorageError::Io(_))));
        assert!(!dir.join("cart.json.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_reopen_sees_previous_records() {
        let dir = scratch_dir();
        FileStore::open(&dir).unwrap().set("cart", "[]").unwrap();

        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));

        fs::remove_dir_all(dir).unwrap();
    }
}
