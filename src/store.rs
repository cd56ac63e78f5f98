use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Durable key-value store backed by a directory, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        KeyValueStore { dir: dir.as_ref().to_path_buf() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Reads the raw value for a key; a key that was never written is `Ok(None)`
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    /// Writes a value through a temporary file and a rename so a reader
    /// never sees a partially written value
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp_path, value).map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KeyValueStore::new(dir.path());
        assert_eq!(store.get("focused").unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KeyValueStore::new(dir.path().join("nested"));
        store.set("focused", "3").unwrap();
        assert_eq!(store.get("focused").unwrap().as_deref(), Some("3"));

        store.set("focused", "null").unwrap();
        assert_eq!(store.get("focused").unwrap().as_deref(), Some("null"));
        assert!(!dir.path().join("nested").join(".focused.json.tmp").exists());
    }

    #[test]
    fn values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().expect("tempdir");
        KeyValueStore::new(dir.path()).set("focused", "2").unwrap();
        assert_eq!(KeyValueStore::new(dir.path()).get("focused").unwrap().as_deref(), Some("2"));
    }
}
