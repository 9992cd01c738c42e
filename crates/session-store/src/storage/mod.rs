//! Origin-scoped key-value storage.
//!
//! A [`Storage`] behaves like browser web storage: string keys, string
//! values, shared by every execution context on the same origin. Mutations
//! are applied as batches so a reader never observes half of a login.

mod atomic_io;
mod file;
mod memory;

use std::collections::BTreeMap;

use crate::error::StorageError;

pub(crate) use file::StampedDocument;
pub use file::{DOCUMENT_NAME, FileStorage};
pub use memory::MemoryStorage;

/// The full contents of a storage area.
pub type Document = BTreeMap<String, String>;

/// One mutation within a storage batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    /// Store `value` under `key`, replacing any previous value.
    Set {
        /// Key to write.
        key: String,
        /// New value.
        value: String,
    },
    /// Delete `key` if present.
    Remove {
        /// Key to delete.
        key: String,
    },
}

impl StorageOp {
    /// Build a [`StorageOp::Set`].
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a [`StorageOp::Remove`].
    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    /// The key this operation touches.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// A storage area shared by every context on one origin.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Read several keys from one consistent view of the storage area.
    ///
    /// Values are returned in the order of `keys`. No batch applied by
    /// another context can land between two of the reads.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be read.
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError>;

    /// Apply every operation in `ops` as one atomic batch.
    ///
    /// Returns the keys whose stored value actually changed, in batch order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the batch cannot be persisted; in that
    /// case none of it is visible.
    fn apply(&self, ops: &[StorageOp]) -> Result<Vec<String>, StorageError>;

    /// Apply `ops` only while every `(key, value)` in `expected` still holds.
    ///
    /// `None` as an expected value means the key must be absent. Returns
    /// `None` without writing anything when the storage moved on, otherwise
    /// the keys that changed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the storage cannot be read or the batch
    /// cannot be persisted.
    fn apply_if(
        &self,
        expected: &[(&str, Option<&str>)],
        ops: &[StorageOp],
    ) -> Result<Option<Vec<String>>, StorageError>;

    /// Remove every key. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be written.
    fn clear(&self) -> Result<bool, StorageError>;
}

/// Apply `ops` to `document`, returning the keys that changed.
pub(crate) fn apply_to_document(document: &mut Document, ops: &[StorageOp]) -> Vec<String> {
    let mut changed = Vec::new();
    for op in ops {
        let did_change = match op {
            StorageOp::Set { key, value } => {
                let previous = document.insert(key.clone(), value.clone());
                previous.as_ref() != Some(value)
            }
            StorageOp::Remove { key } => document.remove(key).is_some(),
        };
        if did_change && !changed.iter().any(|k| k == op.key()) {
            changed.push(op.key().to_owned());
        }
    }
    changed
}

/// Values of `keys` in `document`, in order.
pub(crate) fn read_keys(document: &Document, keys: &[&str]) -> Vec<Option<String>> {
    keys.iter().map(|key| document.get(*key).cloned()).collect()
}

/// Whether `document` still holds every expected value.
pub(crate) fn holds(document: &Document, expected: &[(&str, Option<&str>)]) -> bool {
    expected
        .iter()
        .all(|(key, value)| document.get(*key).map(String::as_str) == *value)
}

/// Keys whose values differ between `before` and `after`.
pub(crate) fn changed_keys(before: &Document, after: &Document) -> Vec<String> {
    let mut keys: Vec<String> = before
        .iter()
        .filter(|(key, value)| after.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    keys.extend(
        after
            .keys()
            .filter(|key| !before.contains_key(*key))
            .cloned(),
    );
    keys
}
