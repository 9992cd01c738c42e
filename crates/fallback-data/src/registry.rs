//! Fallback registry types and JSON parsing.
//!
//! The registry is a versioned JSON document holding one array of records per
//! [`Collection`]. Records keep the upstream wire shape and are only checked
//! for being objects with a unique positive integer `id`; field-level
//! decoding belongs to the consumer.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;
use serde_json::Value;

use crate::collection::Collection;
use crate::error::RegistryError;

/// Current supported registry version.
pub const SUPPORTED_VERSION: u32 = 1;

const BUNDLED_JSON: &str = include_str!("../fixtures/fallback.json");

static BUNDLED: LazyLock<Result<FallbackRegistry, RegistryError>> =
    LazyLock::new(|| FallbackRegistry::from_json(BUNDLED_JSON));

/// Sample records grouped by collection.
///
/// # Example
///
/// ```
/// use fallback_data::{Collection, FallbackRegistry};
///
/// let registry = FallbackRegistry::bundled().expect("bundled data is valid");
/// assert!(!registry.records(Collection::Blogs).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRegistry {
    version: u32,
    blogs: Vec<Value>,
    photos: Vec<Value>,
    contacts: Vec<Value>,
}

impl FallbackRegistry {
    /// The dataset compiled into the binary.
    ///
    /// Parsed once on first access.
    ///
    /// # Errors
    ///
    /// Returns the [`RegistryError`] raised while parsing the bundled JSON.
    pub fn bundled() -> Result<&'static Self, RegistryError> {
        BUNDLED.as_ref().map_err(Clone::clone)
    }

    /// Parses a fallback registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or a collection array is missing
    /// - The version is unsupported
    /// - A record is not an object or lacks a positive integer `id`
    /// - Two records in one collection share an `id`
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawFallbackRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a fallback registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawFallbackRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        validate_records(Collection::Blogs, &raw.blogs)?;
        validate_records(Collection::Photos, &raw.photos)?;
        validate_records(Collection::Contacts, &raw.contacts)?;

        Ok(Self {
            version: raw.version,
            blogs: raw.blogs,
            photos: raw.photos,
            contacts: raw.contacts,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns every record in `collection`, in file order.
    #[must_use]
    pub fn records(&self, collection: Collection) -> &[Value] {
        match collection {
            Collection::Blogs => &self.blogs,
            Collection::Photos => &self.photos,
            Collection::Contacts => &self.contacts,
        }
    }

    /// Finds the record in `collection` whose `id` equals `id`.
    #[must_use]
    pub fn find(&self, collection: Collection, id: i64) -> Option<&Value> {
        self.records(collection)
            .iter()
            .find(|record| record_id(record) == Some(id))
    }
}

fn record_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64).filter(|id| *id > 0)
}

fn validate_records(collection: Collection, records: &[Value]) -> Result<(), RegistryError> {
    let mut seen = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if !record.is_object() {
            return Err(RegistryError::RecordNotObject { collection, index });
        }
        let id = record_id(record).ok_or(RegistryError::MissingId { collection, index })?;
        if !seen.insert(id) {
            return Err(RegistryError::DuplicateId { collection, id });
        }
    }
    Ok(())
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
struct RawFallbackRegistry {
    version: u32,
    blogs: Vec<Value>,
    photos: Vec<Value>,
    contacts: Vec<Value>,
}
