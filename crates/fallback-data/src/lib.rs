//! Statically bundled sample records for the data gateway.
//!
//! When the upstream content service cannot be reached the gateway still
//! answers list and detail reads from this dataset. The records are stored
//! in the upstream wire shape so the gateway decodes and normalises them
//! through exactly the same path as live payloads. This crate deliberately
//! knows nothing about the gateway's domain types.
//!
//! # Example
//!
//! ```
//! use fallback_data::{Collection, FallbackRegistry};
//!
//! let json = r#"{
//!     "version": 1,
//!     "blogs": [{"id": 1, "title": "Hello"}],
//!     "photos": [],
//!     "contacts": []
//! }"#;
//!
//! let registry = FallbackRegistry::from_json(json).expect("valid registry");
//! assert_eq!(registry.records(Collection::Blogs).len(), 1);
//! assert!(registry.find(Collection::Blogs, 1).is_some());
//! ```

mod collection;
mod error;
mod registry;

pub use collection::Collection;
pub use error::RegistryError;
pub use registry::{FallbackRegistry, SUPPORTED_VERSION};
