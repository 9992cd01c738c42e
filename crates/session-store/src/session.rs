//! Session and user record types.

use serde::{Deserialize, Serialize};

/// The signed-in user as returned by the login endpoint.
///
/// Replaced wholesale on every login; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Upstream user id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name, when the user set one.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Whether the user may manage content.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the user must change their password before continuing.
    #[serde(default)]
    pub require_password_change: bool,
    /// Creation timestamp, as sent by upstream.
    pub created_at: String,
    /// Last update timestamp, as sent by upstream.
    pub updated_at: String,
}

/// A signed-in session.
///
/// The token and the user record only ever exist together; an absent session
/// is modelled as `Option::<Session>::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: UserRecord,
}

impl Session {
    pub(crate) const fn new(token: String, user: UserRecord) -> Self {
        Self { token, user }
    }

    /// The bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> &UserRecord {
        &self.user
    }
}

/// The view a [`SessionHook`](crate::SessionHook) publishes to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Current session, if any.
    pub session: Option<Session>,
    /// True only until the first initialisation pass completes.
    pub is_loading: bool,
}

impl SessionView {
    pub(crate) const fn loading() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }

    pub(crate) const fn ready(session: Option<Session>) -> Self {
        Self {
            session,
            is_loading: false,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
