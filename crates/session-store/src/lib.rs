//! Origin-scoped login session store.
//!
//! Several execution contexts (browser tabs, windows, CLI processes) share
//! one storage area, their *origin*. Each context opens a [`SessionStore`]
//! on the origin and reads it through a [`SessionHook`]. Whenever one context
//! logs in or out, every other context converges on the same session without
//! a server push channel:
//!
//! - sibling contexts in the same process hear a [`StorageEvent`] on the
//!   origin bus;
//! - contexts in other processes sharing a [`FileStorage`] directory hear it
//!   through a polling [`FileWatcher`];
//! - the writing context hears its own [`SessionChanged`] event.
//!
//! Malformed or partial storage always degrades to "logged out".
//!
//! # Example
//!
//! ```
//! use session_store::{Origin, SessionHook, SessionStore, UserRecord};
//!
//! let origin = Origin::in_memory();
//! let tab_a = SessionHook::new(SessionStore::new(&origin));
//! let tab_b = SessionHook::new(SessionStore::new(&origin));
//! let mut events = origin.subscribe();
//!
//! let user: UserRecord = serde_json::from_str(
//!     r#"{"id": 7, "username": "alice", "created_at": "2025-07-01", "updated_at": "2025-07-01"}"#,
//! )
//! .expect("valid user");
//! tab_a.login("token", &user);
//!
//! let event = events.try_recv().expect("storage event");
//! tab_b.handle_storage_event(&event);
//! assert_eq!(tab_b.session(), tab_a.session());
//! ```

mod broadcast;
mod error;
mod file_watch;
mod hook;
pub mod keys;
mod origin;
mod session;
mod storage;
mod store;

pub use broadcast::{CrossContextBroadcaster, Notification, SessionChanged, Subscription};
pub use error::{SessionError, StorageError};
pub use file_watch::{DEFAULT_POLL_INTERVAL, FileWatcher};
pub use hook::SessionHook;
pub use origin::{ContextId, Origin, StorageEvent};
pub use session::{Session, SessionView, UserRecord};
pub use storage::{DOCUMENT_NAME, Document, FileStorage, MemoryStorage, Storage, StorageOp};
pub use store::SessionStore;
