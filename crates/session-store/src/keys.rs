//! Storage keys and event names shared by every context on an origin.

/// Storage key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key holding the JSON-encoded [`UserRecord`](crate::UserRecord).
pub const USER_INFO_KEY: &str = "user_info";

/// Both session keys, in write order.
pub const SESSION_KEYS: [&str; 2] = [ACCESS_TOKEN_KEY, USER_INFO_KEY];

/// Name of the intra-context notification fired by login and logout.
pub const SESSION_CHANGE_EVENT: &str = "session-change";

/// Whether `key` is one of the session keys.
#[must_use]
pub fn is_session_key(key: &str) -> bool {
    SESSION_KEYS.contains(&key)
}
