//! Error types for the fallback-data crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::collection::Collection;

/// Errors that can occur when loading a fallback registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// A record is not a JSON object.
    #[error("{collection} record at index {index} is not an object")]
    RecordNotObject {
        /// Collection holding the record.
        collection: Collection,
        /// Index of the record in its array.
        index: usize,
    },

    /// A record lacks a positive integer `id`.
    #[error("{collection} record at index {index} has no positive integer id")]
    MissingId {
        /// Collection holding the record.
        collection: Collection,
        /// Index of the record in its array.
        index: usize,
    },

    /// Two records in one collection share an id.
    #[error("{collection} contains duplicate id {id}")]
    DuplicateId {
        /// Collection holding the records.
        collection: Collection,
        /// The repeated id.
        id: i64,
    },
}
