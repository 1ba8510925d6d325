//! In-memory key-value store, used when nothing should touch disk.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{validate_key, KeyValueStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, e.g. to simulate a corrupted blob.
    pub fn with_record(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut records) = store.records.write() {
            records.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Io(std::io::Error::other(e.to_string())))?;
        Ok(records.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Io(std::io::Error::other(e.to_string())))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
