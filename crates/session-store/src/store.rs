//! The durable "who is signed in" record for one execution context.

use tracing::{debug, warn};

use crate::broadcast::CrossContextBroadcaster;
use crate::error::SessionError;
use crate::keys::{ACCESS_TOKEN_KEY, SESSION_KEYS, USER_INFO_KEY};
use crate::origin::{ContextId, Origin};
use crate::session::{Session, UserRecord};
use crate::storage::{Storage, StorageOp};

/// Reads and writes the session keys of an origin on behalf of one context.
///
/// Every write is a complete overwrite of both keys applied as one storage
/// batch, and every read re-derives the whole session, so concurrent writers
/// converge without further locking.
#[derive(Debug, Clone)]
pub struct SessionStore {
    broadcaster: CrossContextBroadcaster,
}

impl SessionStore {
    /// Open a new execution context on `origin`.
    #[must_use]
    pub fn new(origin: &Origin) -> Self {
        Self {
            broadcaster: CrossContextBroadcaster::new(origin.clone()),
        }
    }

    /// The context this store writes as.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.broadcaster.context()
    }

    /// The notification fan-out for this context.
    #[must_use]
    pub const fn broadcaster(&self) -> &CrossContextBroadcaster {
        &self.broadcaster
    }

    fn storage(&self) -> &dyn Storage {
        self.broadcaster.origin().storage()
    }

    /// Derive the current session from storage.
    ///
    /// Both keys are read from one consistent view. A missing key, a blank
    /// token, an unparseable user record or an unreadable store all yield
    /// `None`; in the first three cases both keys are removed so storage
    /// never holds half a session, unless another context rewrote them in
    /// the meantime.
    #[must_use]
    pub fn initialize(&self) -> Option<Session> {
        let (token, user) = match self.storage().get_many(&SESSION_KEYS) {
            Ok(values) => match <[Option<String>; 2]>::try_from(values) {
                Ok([stored_token, stored_user]) => (stored_token, stored_user),
                Err(short) => {
                    warn!(context = %self.context(), read = short.len(), "session storage returned a short read");
                    return None;
                }
            },
            Err(err) => {
                warn!(context = %self.context(), error = %err, "session storage unreadable");
                return None;
            }
        };

        match (token.as_deref(), user.as_deref()) {
            (None, None) => None,
            (Some(token_value), Some(user_json)) if !token_value.trim().is_empty() => {
                match serde_json::from_str::<UserRecord>(user_json) {
                    Ok(record) => Some(Session::new(token_value.to_owned(), record)),
                    Err(err) => {
                        warn!(context = %self.context(), error = %err, "discarding unparseable user record");
                        self.discard(token.as_deref(), user.as_deref());
                        None
                    }
                }
            }
            (seen_token, seen_user) => {
                warn!(context = %self.context(), "discarding partial session");
                self.discard(seen_token, seen_user);
                None
            }
        }
    }

    /// Store `token` and `user` as the session for the whole origin.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BlankToken`] for an empty token,
    /// [`SessionError::Encode`] if the user cannot be serialised, and
    /// [`SessionError::Storage`] if the batch cannot be written. Nothing is
    /// stored or broadcast on error.
    pub fn login(&self, token: &str, user: &UserRecord) -> Result<Session, SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::BlankToken);
        }
        let user_json = serde_json::to_string(user).map_err(|err| SessionError::Encode {
            message: err.to_string(),
        })?;

        let changed = self.storage().apply(&[
            StorageOp::set(ACCESS_TOKEN_KEY, token),
            StorageOp::set(USER_INFO_KEY, user_json),
        ])?;
        debug!(context = %self.context(), user = %user.username, "session stored");
        self.broadcaster.storage_changed(changed);
        self.broadcaster.session_changed();

        Ok(Session::new(token.to_owned(), user.clone()))
    }

    /// Remove the session from the whole origin.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the batch cannot be written.
    pub fn logout(&self) -> Result<(), SessionError> {
        let changed = self.storage().apply(&remove_session_keys())?;
        debug!(context = %self.context(), "session removed");
        self.broadcaster.storage_changed(changed);
        self.broadcaster.session_changed();
        Ok(())
    }

    // Removes the keys only while they still hold what `initialize` saw.
    fn discard(&self, token: Option<&str>, user: Option<&str>) {
        let expected = [(ACCESS_TOKEN_KEY, token), (USER_INFO_KEY, user)];
        match self.storage().apply_if(&expected, &remove_session_keys()) {
            Ok(Some(changed)) => self.broadcaster.storage_changed(changed),
            Ok(None) => debug!(context = %self.context(), "session rewritten concurrently; keeping it"),
            Err(err) => warn!(context = %self.context(), error = %err, "failed to discard session"),
        }
    }
}

fn remove_session_keys() -> [StorageOp; 2] {
    SESSION_KEYS.map(StorageOp::remove)
}
