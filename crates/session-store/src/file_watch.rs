//! Polling watcher that turns other processes' writes into storage events.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::error::StorageError;
use crate::origin::{ContextId, Origin, StorageEvent};
use crate::storage::{FileStorage, StampedDocument, changed_keys};

/// Default interval between two reads of the storage document.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Watches a [`FileStorage`] document for writes made outside this process.
///
/// Writes made through the watched handle are already announced on the
/// origin bus, so a document stamped by that handle is absorbed silently.
/// A document stamped by anyone else is diffed against the last observed
/// document and republished as storage events attributed to the watcher's
/// own context, even when its contents match an earlier own write.
#[derive(Debug)]
pub struct FileWatcher {
    origin: Origin,
    storage: Arc<FileStorage>,
    context: ContextId,
    known: StampedDocument,
}

impl FileWatcher {
    /// Start watching `storage`, publishing on `origin`'s bus.
    ///
    /// `origin` should wrap the same `storage`.
    #[must_use]
    pub fn new(origin: &Origin, storage: Arc<FileStorage>) -> Self {
        let known = read(&storage).unwrap_or_default();
        Self {
            origin: origin.clone(),
            storage,
            context: ContextId::new(),
            known,
        }
    }

    /// The context foreign writes are attributed to.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// Read the document once and publish any foreign change.
    ///
    /// Returns the number of events published.
    pub fn poll(&mut self) -> usize {
        let Some(current) = read(&self.storage) else {
            return 0;
        };
        if current == self.known {
            return 0;
        }

        let previous = std::mem::replace(&mut self.known, current);
        if self.storage.is_own_write(&self.known) {
            return 0;
        }

        let keys = changed_keys(&previous.entries, &self.known.entries);
        if keys.is_empty() {
            return 0;
        }
        if self.known.entries.is_empty() {
            debug!(context = %self.context, "storage cleared by another process");
            self.origin.publish(StorageEvent::cleared(self.context));
            return 1;
        }

        debug!(context = %self.context, ?keys, "storage changed by another process");
        for key in &keys {
            self.origin
                .publish(StorageEvent::changed(key.as_str(), self.context));
        }
        keys.len()
    }

    /// Poll every `interval` on a Tokio task until the task is aborted.
    #[must_use]
    pub fn spawn(mut self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                self.poll();
            }
        })
    }
}

fn read(storage: &FileStorage) -> Option<StampedDocument> {
    match storage.stamped_snapshot() {
        Ok(document) => Some(document),
        Err(StorageError::Corrupt { .. }) => Some(StampedDocument::default()),
        Err(err) => {
            debug!(error = %err, "skipping storage poll");
            None
        }
    }
}
