//! Storage persisted as one JSON document per origin directory.
//!
//! Every process that opens the same directory shares the storage area.
//! Batches are written through [`write_atomic`], so other processes never
//! read a partially written document; the [`FileWatcher`](crate::FileWatcher)
//! turns their changes into storage events.
//!
//! Each write stamps the document with the writing handle's id and a
//! generation counter. Watchers compare stamps rather than contents, so a
//! foreign write that reproduces a document this handle once wrote is
//! still seen as foreign.

use std::io;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::atomic_io::write_atomic;
use super::{Document, Storage, StorageOp, apply_to_document, holds, read_keys};
use crate::error::StorageError;

/// File name of the storage document inside the origin directory.
pub const DOCUMENT_NAME: &str = "storage.json";

/// Identifies one write: the handle that made it and its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct WriteStamp {
    writer: String,
    generation: u64,
}

/// The document as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StampedDocument {
    pub(crate) stamp: Option<WriteStamp>,
    pub(crate) entries: Document,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    #[serde(flatten)]
    stamp: WriteStamp,
    entries: Document,
}

// Hand-written documents without a stamp stay readable.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Stamped(Envelope),
    Plain(Document),
}

/// A [`Storage`] persisted to `<root>/storage.json`.
#[derive(Debug)]
pub struct FileStorage {
    root: Utf8PathBuf,
    dir: Dir,
    writer: String,
    // Serialises read-modify-write within this handle; holds the generation
    // of the last write.
    generation: Mutex<u64>,
}

impl FileStorage {
    /// Open (creating if needed) the origin directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        let io_error = |err: io::Error| StorageError::Io {
            path: root.clone(),
            message: err.to_string(),
        };
        std::fs::create_dir_all(&root).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).map_err(io_error)?;
        Ok(Self {
            root,
            dir,
            writer: Uuid::new_v4().to_string(),
            generation: Mutex::new(0),
        })
    }

    /// Path of the storage document.
    #[must_use]
    pub fn document_path(&self) -> Utf8PathBuf {
        self.root.join(DOCUMENT_NAME)
    }

    /// Read the whole document as it currently exists on disk.
    ///
    /// A missing document is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be read and
    /// [`StorageError::Corrupt`] if it is not a JSON object of strings.
    pub fn snapshot(&self) -> Result<Document, StorageError> {
        self.stamped_snapshot().map(|document| document.entries)
    }

    /// The document together with the stamp of the write that produced it.
    pub(crate) fn stamped_snapshot(&self) -> Result<StampedDocument, StorageError> {
        let text = match self.dir.read_to_string(DOCUMENT_NAME) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StampedDocument::default());
            }
            Err(err) => {
                return Err(StorageError::Io {
                    path: self.document_path(),
                    message: err.to_string(),
                });
            }
        };
        let on_disk: OnDisk = serde_json::from_str(&text).map_err(|err| StorageError::Corrupt {
            path: self.document_path(),
            message: err.to_string(),
        })?;
        Ok(match on_disk {
            OnDisk::Stamped(Envelope { stamp, entries }) => StampedDocument {
                stamp: Some(stamp),
                entries,
            },
            OnDisk::Plain(entries) => StampedDocument {
                stamp: None,
                entries,
            },
        })
    }

    /// Whether `document` was written through this handle.
    pub(crate) fn is_own_write(&self, document: &StampedDocument) -> bool {
        document
            .stamp
            .as_ref()
            .is_some_and(|stamp| stamp.writer == self.writer)
    }

    /// Snapshot that treats a corrupt document as empty.
    fn readable_snapshot(&self) -> Result<Document, StorageError> {
        match self.snapshot() {
            Err(err @ StorageError::Corrupt { .. }) => {
                warn!(error = %err, "discarding unreadable storage document");
                Ok(Document::new())
            }
            other => other,
        }
    }

    fn write(&self, generation: &mut u64, entries: Document) -> Result<(), StorageError> {
        let next = *generation + 1;
        let envelope = Envelope {
            stamp: WriteStamp {
                writer: self.writer.clone(),
                generation: next,
            },
            entries,
        };
        let text = serde_json::to_string_pretty(&envelope).map_err(|err| StorageError::Io {
            path: self.document_path(),
            message: err.to_string(),
        })?;
        write_atomic(&self.dir, &self.root, DOCUMENT_NAME, &text)?;
        *generation = next;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, u64>, StorageError> {
        self.generation.lock().map_err(|_| StorageError::Poisoned)
    }

    fn apply_locked(
        &self,
        generation: &mut u64,
        mut document: Document,
        ops: &[StorageOp],
    ) -> Result<Vec<String>, StorageError> {
        let changed = apply_to_document(&mut document, ops);
        if !changed.is_empty() {
            self.write(generation, document)?;
        }
        Ok(changed)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut document = self.readable_snapshot()?;
        Ok(document.remove(key))
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StorageError> {
        Ok(read_keys(&self.readable_snapshot()?, keys))
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<Vec<String>, StorageError> {
        let mut generation = self.lock()?;
        let document = self.readable_snapshot()?;
        self.apply_locked(&mut generation, document, ops)
    }

    // Another process may still write between this read and the rename; the
    // check is against the newest document visible to this handle.
    fn apply_if(
        &self,
        expected: &[(&str, Option<&str>)],
        ops: &[StorageOp],
    ) -> Result<Option<Vec<String>>, StorageError> {
        let mut generation = self.lock()?;
        let document = self.readable_snapshot()?;
        if !holds(&document, expected) {
            return Ok(None);
        }
        self.apply_locked(&mut generation, document, ops).map(Some)
    }

    fn clear(&self) -> Result<bool, StorageError> {
        let mut generation = self.lock()?;
        if self.readable_snapshot()?.is_empty() {
            return Ok(false);
        }
        self.write(&mut generation, Document::new())?;
        Ok(true)
    }
}
