use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::store::PersistenceError;

/// Durable string storage addressed by key.
pub trait KeyValueStore: Send + Sync {
    /// Ok(None) when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// One file per key under a base directory. Keys are used as file names.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, PersistenceError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(Self::file_name(key))
    }

    /// A leading dot becomes `_` so no key can name `.`, `..` or a hidden file.
    fn file_name(key: &str) -> String {
        key.chars()
            .enumerate()
            .map(|(i, c)| match c {
                '.' if i == 0 => '_',
                c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
                _ => '_',
            })
            .collect()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.file_path(key);
        let tmp_path = self
            .base_dir
            .join(format!("{}.tmp", Self::file_name(key)));

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Non-durable store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panicked writer cannot leave a half-written String behind.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries().remove(key);
        Ok(())
    }
}
