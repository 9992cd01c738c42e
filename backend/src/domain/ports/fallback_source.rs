//! Driven port for the static fallback dataset.
//!
//! Records are returned in the upstream wire shape so the gateway decodes
//! them through the same raw types and `normalize` step as live payloads.

use serde_json::Value;

use super::define_port_error;
use crate::domain::ResourceKind;

define_port_error! {
    /// Errors surfaced while reading the fallback dataset.
    pub enum FallbackSourceError {
        /// Fallback serving is switched off by configuration.
        Disabled =>
            "fallback dataset is disabled",
        /// The dataset could not be loaded.
        Unavailable { message: String } =>
            "fallback dataset unavailable: {message}",
    }
}

/// Port for reading fallback records.
#[cfg_attr(test, mockall::automock)]
pub trait FallbackSource: Send + Sync {
    /// Every record of `kind`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackSourceError`] when the dataset is disabled or
    /// failed to load.
    fn records(&self, kind: ResourceKind) -> Result<Vec<Value>, FallbackSourceError>;

    /// The record of `kind` whose id is `id`, if the dataset holds one.
    ///
    /// # Errors
    ///
    /// As for [`FallbackSource::records`].
    fn record(&self, kind: ResourceKind, id: i64) -> Result<Option<Value>, FallbackSourceError>;
}
