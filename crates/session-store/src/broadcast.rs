//! Session change notifications within and across execution contexts.
//!
//! Two channels exist. Storage events travel over the origin bus and are
//! delivered to every context except the writer. [`SessionChanged`] events
//! stay inside the context that performed a login or logout.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

use crate::keys::SESSION_CHANGE_EVENT;
use crate::origin::{ContextId, Origin, StorageEvent};

const LOCAL_CAPACITY: usize = 16;

/// Intra-context notification fired by login and logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChanged {
    writer: ContextId,
}

impl SessionChanged {
    /// The event name, `"session-change"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        SESSION_CHANGE_EVENT
    }

    /// The context that fired the event.
    #[must_use]
    pub const fn writer(&self) -> ContextId {
        self.writer
    }
}

/// Something a subscriber should react to by re-deriving its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Another context changed a session key.
    Storage(StorageEvent),
    /// This context logged in or out.
    SessionChanged(SessionChanged),
    /// Events were dropped; the subscriber must re-derive unconditionally.
    Resync,
}

/// Fans session changes out to the current context and its siblings.
#[derive(Debug, Clone)]
pub struct CrossContextBroadcaster {
    context: ContextId,
    origin: Origin,
    local: broadcast::Sender<SessionChanged>,
}

impl CrossContextBroadcaster {
    /// Open a new execution context on `origin`.
    #[must_use]
    pub fn new(origin: Origin) -> Self {
        let (local, _) = broadcast::channel(LOCAL_CAPACITY);
        Self {
            context: ContextId::new(),
            origin,
            local,
        }
    }

    /// The context this broadcaster speaks for.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// The origin shared with sibling contexts.
    #[must_use]
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Tell sibling contexts that `keys` changed.
    pub fn storage_changed<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.origin
                .publish(StorageEvent::changed(key, self.context));
        }
    }

    /// Fire the intra-context `session-change` event.
    pub fn session_changed(&self) {
        let event = SessionChanged {
            writer: self.context,
        };
        if self.local.send(event).is_err() {
            debug!(context = %self.context, "no session-change listeners");
        }
    }

    /// Listen to both channels.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            context: self.context,
            storage: self.origin.subscribe(),
            local: self.local.subscribe(),
        }
    }
}

/// A context's view of both notification channels.
///
/// Storage events written by the subscribing context itself, or touching
/// keys unrelated to the session, are filtered out.
#[derive(Debug)]
pub struct Subscription {
    context: ContextId,
    storage: broadcast::Receiver<StorageEvent>,
    local: broadcast::Receiver<SessionChanged>,
}

impl Subscription {
    /// Wait for the next relevant notification.
    ///
    /// Returns `None` once either channel has closed.
    pub async fn recv(&mut self) -> Option<Notification> {
        let context = self.context;
        loop {
            let notification = tokio::select! {
                event = self.storage.recv() => accept_storage(context, event),
                event = self.local.recv() => accept_local(event),
            };
            match notification {
                Accepted::Notify(notification) => return Some(notification),
                Accepted::Skip => {}
                Accepted::Closed => return None,
            }
        }
    }

    /// Take the next relevant notification without waiting.
    pub fn try_recv(&mut self) -> Option<Notification> {
        loop {
            let notification = match self.storage.try_recv() {
                Ok(event) => accept_storage(self.context, Ok(event)),
                Err(TryRecvError::Lagged(skipped)) => {
                    accept_storage(self.context, Err(RecvError::Lagged(skipped)))
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => match self.local.try_recv() {
                    Ok(event) => accept_local(Ok(event)),
                    Err(TryRecvError::Lagged(skipped)) => {
                        accept_local(Err(RecvError::Lagged(skipped)))
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
                },
            };
            match notification {
                Accepted::Notify(notification) => return Some(notification),
                Accepted::Skip => {}
                Accepted::Closed => return None,
            }
        }
    }
}

enum Accepted {
    Notify(Notification),
    Skip,
    Closed,
}

fn accept_storage(context: ContextId, event: Result<StorageEvent, RecvError>) -> Accepted {
    match event {
        Ok(event) if event.writer() != context && event.concerns_session() => {
            Accepted::Notify(Notification::Storage(event))
        }
        Ok(_) => Accepted::Skip,
        Err(RecvError::Lagged(skipped)) => {
            debug!(%context, skipped, "storage events lagged");
            Accepted::Notify(Notification::Resync)
        }
        Err(RecvError::Closed) => Accepted::Closed,
    }
}

fn accept_local(event: Result<SessionChanged, RecvError>) -> Accepted {
    match event {
        Ok(event) => Accepted::Notify(Notification::SessionChanged(event)),
        Err(RecvError::Lagged(_)) => Accepted::Notify(Notification::Resync),
        Err(RecvError::Closed) => Accepted::Closed,
    }
}
