//! In-process storage shared by contexts in one process.

use std::sync::Mutex;

use super::{Document, Storage, StorageOp, apply_to_document, holds, read_keys};
use crate::error::StorageError;

/// A [`Storage`] kept in memory behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Document>,
}

impl MemoryStorage {
    /// Create an empty storage area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` under `key` without going through a session store.
    ///
    /// Useful for simulating a foreign writer or corrupt state.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn insert_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(&[StorageOp::set(key, value)]).map(drop)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let document = self.document.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(document.get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        let document = self.document.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(read_keys(&document, keys))
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<Vec<String>, StorageError> {
        let mut document = self.document.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(apply_to_document(&mut document, ops))
    }

    fn apply_if(
        &self,
        expected: &[(&str, Option<&str>)],
        ops: &[StorageOp],
    ) -> Result<Option<Vec<String>>, StorageError> {
        let mut document = self.document.lock().map_err(|_| StorageError::Poisoned)?;
        if !holds(&document, expected) {
            return Ok(None);
        }
        Ok(Some(apply_to_document(&mut document, ops)))
    }

    fn clear(&self) -> Result<bool, StorageError> {
        let mut document = self.document.lock().map_err(|_| StorageError::Poisoned)?;
        let had_entries = !document.is_empty();
        document.clear();
        Ok(had_entries)
    }
}
