//! Origins, execution contexts and cross-context storage events.

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::keys::is_session_key;
use crate::storage::{MemoryStorage, Storage};

const BUS_CAPACITY: usize = 64;

/// Identifies one execution context (a tab, a window, a process view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Allocate a fresh context id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A storage mutation observed by contexts other than the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    key: Option<String>,
    writer: ContextId,
}

impl StorageEvent {
    /// `key` changed in a batch written by `writer`.
    pub fn changed(key: impl Into<String>, writer: ContextId) -> Self {
        Self {
            key: Some(key.into()),
            writer,
        }
    }

    /// The whole storage area was cleared by `writer`.
    #[must_use]
    pub const fn cleared(writer: ContextId) -> Self {
        Self { key: None, writer }
    }

    /// The changed key, or `None` for a whole-storage clear.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The context that performed the write.
    #[must_use]
    pub const fn writer(&self) -> ContextId {
        self.writer
    }

    /// Whether the event can affect the session.
    #[must_use]
    pub fn concerns_session(&self) -> bool {
        self.key.as_deref().is_none_or(is_session_key)
    }
}

/// A storage area plus the bus its contexts use to observe each other.
///
/// Cloning an origin yields another handle onto the same storage and bus.
#[derive(Clone)]
pub struct Origin {
    storage: Arc<dyn Storage>,
    bus: broadcast::Sender<StorageEvent>,
}

impl Origin {
    /// Wrap `storage` in a new origin.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (bus, _) = broadcast::channel(BUS_CAPACITY);
        Self { storage, bus }
    }

    /// An origin backed by fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// The shared storage area.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Receive every storage event published on this origin.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.bus.subscribe()
    }

    /// Publish `event` to every subscribed context.
    pub fn publish(&self, event: StorageEvent) {
        if self.bus.send(event).is_err() {
            // Nobody is listening.
        }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
            .field("subscribers", &self.bus.receiver_count())
            .finish_non_exhaustive()
    }
}
