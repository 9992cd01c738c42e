//! The subscribe-and-act façade consumed by UI code.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::broadcast::{Notification, SessionChanged};
use crate::origin::StorageEvent;
use crate::session::{Session, SessionView, UserRecord};
use crate::store::SessionStore;

/// Exposes the current session and login/logout actions for one context.
///
/// The view is published through a [`watch`] channel; subscribers are woken
/// whenever the derived session actually changes.
///
/// # Example
///
/// ```
/// use session_store::{Origin, SessionHook, SessionStore, UserRecord};
///
/// let origin = Origin::in_memory();
/// let hook = SessionHook::new(SessionStore::new(&origin));
/// assert!(!hook.is_loading());
///
/// let user = UserRecord {
///     id: 1,
///     username: "alice".into(),
///     full_name: None,
///     is_admin: false,
///     require_password_change: false,
///     created_at: "2025-07-01T00:00:00Z".into(),
///     updated_at: "2025-07-01T00:00:00Z".into(),
/// };
/// hook.login("token", &user);
/// assert_eq!(hook.session().map(|s| s.user().id), Some(1));
/// ```
#[derive(Debug)]
pub struct SessionHook {
    store: SessionStore,
    view: watch::Sender<SessionView>,
}

impl SessionHook {
    /// Build a hook and run its first initialisation pass.
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        let (view, _) = watch::channel(SessionView::loading());
        let hook = Self { store, view };
        hook.refresh();
        hook
    }

    /// The store this hook reads and writes through.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// The current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.view.borrow().session.clone()
    }

    /// Whether the first initialisation pass is still running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.view.borrow().is_loading
    }

    /// Receive every subsequent change to the view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    /// Sign in. Failures are logged and leave the view untouched.
    pub fn login(&self, token: &str, user: &UserRecord) {
        if let Err(err) = self.store.login(token, user) {
            warn!(context = %self.store.context(), error = %err, "login not stored");
            return;
        }
        self.refresh();
    }

    /// Sign out. Failures are logged.
    pub fn logout(&self) {
        if let Err(err) = self.store.logout() {
            warn!(context = %self.store.context(), error = %err, "logout not stored");
        }
        self.refresh();
    }

    /// Cross-context handler: re-derive the session after a sibling wrote.
    ///
    /// Events written by this context or touching unrelated keys are
    /// ignored. Returns whether the view changed.
    pub fn handle_storage_event(&self, event: &StorageEvent) -> bool {
        if event.writer() == self.store.context() || !event.concerns_session() {
            return false;
        }
        self.refresh()
    }

    /// Intra-context handler for the `session-change` event.
    ///
    /// Returns whether the view changed.
    pub fn handle_session_change(&self, event: &SessionChanged) -> bool {
        if event.writer() != self.store.context() {
            return false;
        }
        self.refresh()
    }

    /// Dispatch any notification to the matching handler.
    pub fn handle(&self, notification: &Notification) -> bool {
        match notification {
            Notification::Storage(event) => self.handle_storage_event(event),
            Notification::SessionChanged(event) => self.handle_session_change(event),
            Notification::Resync => self.refresh(),
        }
    }

    /// Pump both notification channels into this hook on a Tokio task.
    ///
    /// The task ends once the hook is dropped. Must be called from within a
    /// Tokio runtime.
    pub fn listen(self: &Arc<Self>) -> JoinHandle<()> {
        let mut subscription = self.store.broadcaster().subscribe();
        let mut liveness = self.view.subscribe();
        let hook = Arc::downgrade(self);
        let context = self.store.context();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    notification = subscription.recv() => {
                        let Some(notification) = notification else { break };
                        let Some(hook) = hook.upgrade() else { break };
                        hook.handle(&notification);
                    }
                    alive = liveness.changed() => {
                        if alive.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(%context, "session listener stopped");
        })
    }

    fn refresh(&self) -> bool {
        let next = SessionView::ready(self.store.initialize());
        self.view.send_if_modified(|view| {
            if *view == next {
                false
            } else {
                *view = next;
                true
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::{ContextId, Origin};
    use crate::storage::Storage;
    use std::time::Duration;

    fn user(id: i64, username: &str) -> UserRecord {
        UserRecord {
            id,
            username: username.to_owned(),
            full_name: Some(format!("{username} example")),
            is_admin: id == 1,
            require_password_change: false,
            created_at: "2025-07-01T00:00:00Z".to_owned(),
            updated_at: "2025-07-02T00:00:00Z".to_owned(),
        }
    }

    #[test]
    fn loading_clears_after_the_first_pass() {
        let hook = SessionHook::new(SessionStore::new(&Origin::in_memory()));
        assert!(!hook.is_loading());
        hook.login("t", &user(1, "alice"));
        hook.logout();
        assert!(!hook.is_loading());
    }

    #[test]
    fn sibling_converges_after_one_storage_event() {
        let origin = Origin::in_memory();
        let tab_a = SessionHook::new(SessionStore::new(&origin));
        let tab_b = SessionHook::new(SessionStore::new(&origin));
        let mut events = origin.subscribe();

        tab_a.login("token-a", &user(1, "alice"));
        assert_eq!(tab_b.session(), None);

        let event = events.try_recv().expect("storage event published");
        assert!(tab_b.handle_storage_event(&event));
        assert_eq!(tab_b.session(), tab_a.session());
    }

    #[test]
    fn own_storage_events_are_ignored() {
        let origin = Origin::in_memory();
        let hook = SessionHook::new(SessionStore::new(&origin));
        let event = StorageEvent::changed("access_token", hook.store().context());
        assert!(!hook.handle_storage_event(&event));
    }

    #[test]
    fn foreign_clears_log_the_context_out() {
        let origin = Origin::in_memory();
        let hook = SessionHook::new(SessionStore::new(&origin));
        hook.login("token", &user(1, "alice"));

        origin.storage().clear().expect("clear storage");
        assert!(hook.session().is_some());

        assert!(hook.handle_storage_event(&StorageEvent::cleared(ContextId::new())));
        assert_eq!(hook.session(), None);
    }

    #[test]
    fn failed_logins_leave_the_view_alone() {
        let hook = SessionHook::new(SessionStore::new(&Origin::in_memory()));
        let mut view = hook.subscribe();
        hook.login("", &user(1, "alice"));
        assert_eq!(hook.session(), None);
        assert!(!view.has_changed().expect("sender alive"));
    }

    #[tokio::test]
    async fn listeners_converge_on_sibling_writes() {
        let origin = Origin::in_memory();
        let tab_a = SessionHook::new(SessionStore::new(&origin));
        let tab_b = Arc::new(SessionHook::new(SessionStore::new(&origin)));
        let mut view_b = tab_b.subscribe();
        let listener = tab_b.listen();

        tab_a.login("token-a", &user(1, "alice"));
        tokio::time::timeout(Duration::from_secs(1), view_b.wait_for(SessionView::is_authenticated))
            .await
            .expect("tab b converges in time")
            .expect("sender alive");

        tab_a.logout();
        tokio::time::timeout(Duration::from_secs(1), view_b.wait_for(|view| !view.is_authenticated()))
            .await
            .expect("tab b converges in time")
            .expect("sender alive");

        drop(view_b);
        drop(tab_b);
        tokio::time::timeout(Duration::from_secs(1), listener)
            .await
            .expect("listener stops once the hook is dropped")
            .expect("listener task did not panic");
    }
}
