//! Error types for the session-store crate.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by a [`Storage`](crate::Storage) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage I/O failed at '{path}': {message}")]
    Io {
        /// Path of the storage document.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The storage document is not a JSON object of strings.
    #[error("storage document at '{path}' is corrupt: {message}")]
    Corrupt {
        /// Path of the storage document.
        path: Utf8PathBuf,
        /// Description of the decoding error.
        message: String,
    },

    /// Another thread panicked while holding the storage lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Errors raised by [`SessionStore`](crate::SessionStore) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Login was attempted with an empty token.
    #[error("access token must not be blank")]
    BlankToken,

    /// The user record could not be encoded.
    #[error("failed to encode user record: {message}")]
    Encode {
        /// Description of the encoding error.
        message: String,
    },

    /// The storage backend rejected the write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_formats_correctly() {
        let err = StorageError::Io {
            path: Utf8PathBuf::from("/tmp/origin/storage.json"),
            message: "permission denied".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "storage I/O failed at '/tmp/origin/storage.json': permission denied"
        );
    }

    #[test]
    fn storage_errors_pass_through_session_errors() {
        let err = SessionError::from(StorageError::Poisoned);
        assert_eq!(err.to_string(), "storage lock poisoned");
    }
}
