//! Authentication primitives: forwarded credentials and the login proxy.
//!
//! The gateway never inspects tokens. It only forwards the caller's
//! `Authorization` header upstream and requires one on writes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroizing;

use super::Error;

/// Caller-supplied `Authorization` header value, forwarded unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a raw header value, returning `None` when it is blank.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::AuthToken;
    ///
    /// assert!(AuthToken::from_header("Bearer abc").is_some());
    /// assert!(AuthToken::from_header("  ").is_none());
    /// ```
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(value.to_owned())))
    }

    /// The header value exactly as received.
    #[must_use]
    pub fn as_header_value(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Require credentials on a write path.
///
/// # Errors
///
/// Returns an `unauthorized` [`Error`] when `auth` is `None`.
pub fn require_auth(auth: Option<&AuthToken>) -> Result<&AuthToken, Error> {
    auth.ok_or_else(|| Error::unauthorized("Authorization header is required"))
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl From<LoginValidationError> for Error {
    fn from(err: LoginValidationError) -> Self {
        let (field, code) = match err {
            LoginValidationError::EmptyUsername => ("username", "empty_username"),
            LoginValidationError::EmptyPassword => ("password", "empty_password"),
        };
        Self::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
    }
}

/// Validated login credentials forwarded to the upstream auth endpoint.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty once trimmed but forwarded verbatim.
///
/// # Examples
/// ```
/// use gateway::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "secret").expect("valid");
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    ///
    /// Returns [`LoginValidationError`] for a blank username or password.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.trim().is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username sent upstream.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password sent upstream.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Upstream request body.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        json!({ "username": self.username(), "password": self.password() })
    }
}

/// User record returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Upstream identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Administrator flag.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the user must change their password.
    #[serde(default)]
    pub require_password_change: bool,
    /// Creation timestamp as sent upstream.
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp as sent upstream.
    #[serde(default)]
    pub updated_at: String,
}

/// Successful login payload relayed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    /// Token to store and send back as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Token scheme, normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// The authenticated user.
    pub user: AuthenticatedUser,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}
